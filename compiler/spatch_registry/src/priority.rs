//! Priority DAG construction and cycle-tolerant topological ordering
//! (`spec.md` §3 `Priority DAG`, §4.3 steps 2).

use crate::backend::{Backend, DEFAULT_BACKEND};
use rustc_hash::FxHashMap;
use spatch_types::TypeSpec;
use std::cmp::Ordering;

/// Where a priority edge came from, in the order edges are preferred to
/// survive a cycle break (higher variant wins, `spec.md` §4.3 step 2).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EdgeSource {
    TypeDerived,
    Explicit,
    Env,
}

impl EdgeSource {
    /// Lower is dropped first when breaking a cycle.
    fn drop_precedence(self) -> u8 {
        match self {
            EdgeSource::TypeDerived => 0,
            EdgeSource::Explicit => 1,
            EdgeSource::Env => 2,
        }
    }
}

/// One `from` has-higher-priority-than `to` edge.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub source: EdgeSource,
}

/// A priority cycle was broken by dropping an edge. Never surfaced to
/// callers as an error (`spec.md` §7 `CycleError`); recorded for
/// diagnostics only.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CycleDiagnostic {
    pub dropped: Edge,
}

/// Does `a`'s match set accept every type `b`'s does, for specs that
/// share a type key? Comparable only within a single key: `spec.md` §4.3
/// leaves cross-key and abstract comparisons as "contribute no edges".
fn spec_covers(a: TypeSpec, b: TypeSpec) -> bool {
    if a.is_abstract() || b.is_abstract() {
        return a == b;
    }
    if a.key() != b.key() {
        return false;
    }
    matches!(
        (a, b),
        (TypeSpec::Subclass(_), TypeSpec::Subclass(_))
            | (TypeSpec::Subclass(_), TypeSpec::Exact(_))
            | (TypeSpec::Exact(_), TypeSpec::Exact(_))
    )
}

/// Does every spec in `b` have a covering spec in `a`?
fn covers_all(a: &[TypeSpec], b: &[TypeSpec]) -> bool {
    !b.is_empty() && b.iter().all(|&sb| a.iter().any(|&sa| spec_covers(sa, sb)))
}

/// Build the initial edge set: explicit per-backend hints, env-supplied
/// pairs, and type-derived specificity edges (`spec.md` §4.3 step 2).
pub fn build_edges(backends: &FxHashMap<String, Backend>, env_set_order: &[(String, String)]) -> Vec<Edge> {
    let mut edges = Vec::new();
    let names: std::collections::HashSet<&str> =
        backends.keys().map(std::string::String::as_str).collect();

    for b in backends.values() {
        for higher in &b.higher_priority_than {
            if names.contains(higher.as_str()) {
                edges.push(Edge {
                    from: b.name.clone(),
                    to: higher.clone(),
                    source: EdgeSource::Explicit,
                });
            }
        }
        for lower in &b.lower_priority_than {
            if names.contains(lower.as_str()) {
                edges.push(Edge {
                    from: lower.clone(),
                    to: b.name.clone(),
                    source: EdgeSource::Explicit,
                });
            }
        }
    }

    for (a, b) in env_set_order {
        if names.contains(a.as_str()) && names.contains(b.as_str()) {
            edges.push(Edge {
                from: a.clone(),
                to: b.clone(),
                source: EdgeSource::Env,
            });
        }
    }

    let mut names_sorted: Vec<&String> = backends.keys().collect();
    names_sorted.sort();
    for &a_name in &names_sorted {
        for &b_name in &names_sorted {
            if a_name == b_name {
                continue;
            }
            let a = &backends[a_name];
            let b = &backends[b_name];
            let a_types: Vec<TypeSpec> = a.primary_types.clone();
            let b_types: Vec<TypeSpec> = b.primary_types.clone();
            // a_types a strict superset of b_types (in match-set terms) means
            // b is the more specific backend and is tried first (spec.md §4.3).
            if covers_all(&a_types, &b_types) && !covers_all(&b_types, &a_types) {
                edges.push(Edge {
                    from: b_name.clone(),
                    to: a_name.clone(),
                    source: EdgeSource::TypeDerived,
                });
            }
        }
    }

    edges
}

/// Resolve a total-ish order (highest priority first) from a possibly
/// cyclic edge set, dropping the lowest-precedence edge in any cycle
/// until a topological sort succeeds (`spec.md` §4.3 step 2, §8
/// cycle-tolerance).
pub fn resolve_order(
    backend_names: &[String],
    mut edges: Vec<Edge>,
) -> (Vec<String>, Vec<CycleDiagnostic>) {
    let mut diagnostics = Vec::new();

    loop {
        match try_topo_sort(backend_names, &edges) {
            Ok(order) => return (order, diagnostics),
            Err(stuck) => {
                let Some(victim_idx) = pick_drop_candidate(&edges, &stuck) else {
                    // No edges left among the stuck set but still unsorted:
                    // cannot happen since an edge-free graph always sorts,
                    // but fall back to alphabetic-default-last for safety.
                    let mut rest: Vec<String> = stuck.into_iter().collect();
                    rest.sort();
                    return (tie_break_remaining(rest), diagnostics);
                };
                let dropped = edges.remove(victim_idx);
                tracing::warn!(
                    from = %dropped.from,
                    to = %dropped.to,
                    source = ?dropped.source,
                    "dropping priority edge to break a cycle"
                );
                diagnostics.push(CycleDiagnostic { dropped });
            }
        }
    }
}

fn pick_drop_candidate(edges: &[Edge], stuck: &std::collections::HashSet<String>) -> Option<usize> {
    edges
        .iter()
        .enumerate()
        .filter(|(_, e)| stuck.contains(&e.from) && stuck.contains(&e.to))
        .min_by(|(_, a), (_, b)| {
            a.source
                .drop_precedence()
                .cmp(&b.source.drop_precedence())
                .then_with(|| a.from.cmp(&b.from))
                .then_with(|| a.to.cmp(&b.to))
        })
        .map(|(i, _)| i)
}

/// Kahn's algorithm with `default`-last-then-alphabetic tie-breaking
/// (`spec.md` §4.3 step 2). Returns the unresolved remainder on stall.
fn try_topo_sort(
    backend_names: &[String],
    edges: &[Edge],
) -> Result<Vec<String>, std::collections::HashSet<String>> {
    let mut in_degree: FxHashMap<&str, usize> =
        backend_names.iter().map(|n| (n.as_str(), 0)).collect();
    let mut outgoing: FxHashMap<&str, Vec<&str>> =
        backend_names.iter().map(|n| (n.as_str(), Vec::new())).collect();

    for e in edges {
        outgoing.entry(e.from.as_str()).or_default().push(e.to.as_str());
        *in_degree.entry(e.to.as_str()).or_insert(0) += 1;
    }

    let mut remaining: std::collections::HashSet<String> = backend_names.iter().cloned().collect();
    let mut order = Vec::with_capacity(backend_names.len());

    while !remaining.is_empty() {
        let ready: Vec<&str> = remaining
            .iter()
            .filter(|n| in_degree.get(n.as_str()).copied().unwrap_or(0) == 0)
            .map(std::string::String::as_str)
            .collect();

        if ready.is_empty() {
            return Err(remaining);
        }

        let picked = pick_next(&ready).to_owned();
        remaining.remove(&picked);
        for &next in outgoing.get(picked.as_str()).into_iter().flatten() {
            if let Some(d) = in_degree.get_mut(next) {
                *d = d.saturating_sub(1);
            }
        }
        order.push(picked);
    }

    Ok(order)
}

/// Among nodes ready to be placed next, prefer non-`default`, then
/// alphabetically earliest.
fn pick_next<'a>(ready: &[&'a str]) -> &'a str {
    ready
        .iter()
        .copied()
        .min_by(|a, b| {
            let a_is_default = *a == DEFAULT_BACKEND;
            let b_is_default = *b == DEFAULT_BACKEND;
            match (a_is_default, b_is_default) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => a.cmp(b),
            }
        })
        .unwrap_or(ready[0])
}

fn tie_break_remaining(mut rest: Vec<String>) -> Vec<String> {
    rest.sort_by(|a, b| {
        let a_is_default = a == DEFAULT_BACKEND;
        let b_is_default = b == DEFAULT_BACKEND;
        match (a_is_default, b_is_default) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => a.cmp(b),
        }
    });
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatch_types::TypeKey;

    fn backend(name: &str) -> Backend {
        Backend {
            name: name.to_owned(),
            primary_types: Vec::new(),
            secondary_types: Vec::new(),
            requires_opt_in: false,
            higher_priority_than: Vec::new(),
            lower_priority_than: Vec::new(),
            functions: rustc_hash::FxHashMap::default(),
        }
    }

    #[test]
    fn default_sorts_last_with_no_edges() {
        let names = vec!["default".to_owned(), "b".to_owned(), "a".to_owned()];
        let (order, diags) = resolve_order(&names, vec![]);
        assert_eq!(order, vec!["a", "b", "default"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn explicit_edge_overrides_default_last() {
        let names = vec!["default".to_owned(), "b".to_owned()];
        let edges = vec![Edge {
            from: "default".to_owned(),
            to: "b".to_owned(),
            source: EdgeSource::Explicit,
        }];
        let (order, _) = resolve_order(&names, edges);
        assert_eq!(order, vec!["default", "b"]);
    }

    #[test]
    fn cycle_is_broken_by_dropping_lowest_precedence_edge() {
        let names = vec!["a".to_owned(), "b".to_owned()];
        let edges = vec![
            Edge {
                from: "a".to_owned(),
                to: "b".to_owned(),
                source: EdgeSource::TypeDerived,
            },
            Edge {
                from: "b".to_owned(),
                to: "a".to_owned(),
                source: EdgeSource::Explicit,
            },
        ];
        let (order, diags) = resolve_order(&names, edges);
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].dropped.source, EdgeSource::TypeDerived);
    }

    #[test]
    fn type_derived_edge_prefers_more_specific_backend() {
        let mut backends = FxHashMap::default();
        let int_key = TypeKey::new("builtins", "int");
        let number_key = TypeKey::new("builtins", "number");

        let mut specific = backend("specific");
        specific.primary_types = vec![TypeSpec::Exact(int_key)];
        let mut general = backend("general");
        general.primary_types = vec![TypeSpec::Subclass(number_key)];

        // Make `specific`'s exact(int) covered by `general`'s subclass
        // only when keys match; here they don't, so no edge should form
        // (cross-key comparisons contribute nothing per spec.md §4.3).
        backends.insert(specific.name.clone(), specific);
        backends.insert(general.name.clone(), general);
        let edges = build_edges(&backends, &[]);
        assert!(edges.is_empty());
    }

    #[test]
    fn type_derived_edge_forms_for_same_key_subclass_vs_exact() {
        let mut backends = FxHashMap::default();
        let key = TypeKey::new("builtins", "int");

        let mut specific = backend("specific");
        specific.primary_types = vec![TypeSpec::Exact(key)];
        let mut general = backend("general");
        general.primary_types = vec![TypeSpec::Subclass(key)];

        backends.insert(specific.name.clone(), specific);
        backends.insert(general.name.clone(), general);
        let edges = build_edges(&backends, &[]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, "specific");
        assert_eq!(edges[0].to, "general");
    }

    // `spec.md` §8 cycle-tolerance: `resolve_order` must never panic or
    // stall, and must always return every input name exactly once, no
    // matter how tangled (including fully cyclic) the edge set is.
    proptest::proptest! {
        #[test]
        fn resolve_order_always_yields_a_total_permutation(
            n in 2usize..6,
            edge_picks in proptest::collection::vec((0usize..6, 0usize..6, 0u8..3), 0..20),
        ) {
            let names: Vec<String> = (0..n).map(|i| format!("b{i}")).collect();
            let source_for = |tag: u8| match tag {
                0 => EdgeSource::TypeDerived,
                1 => EdgeSource::Explicit,
                _ => EdgeSource::Env,
            };
            let edges: Vec<Edge> = edge_picks
                .into_iter()
                .filter(|&(a, b, _)| a < n && b < n && a != b)
                .map(|(a, b, tag)| Edge {
                    from: names[a].clone(),
                    to: names[b].clone(),
                    source: source_for(tag),
                })
                .collect();

            let (order, _diags) = resolve_order(&names, edges);

            let mut sorted_order = order.clone();
            sorted_order.sort();
            let mut sorted_names = names.clone();
            sorted_names.sort();
            proptest::prop_assert_eq!(sorted_order, sorted_names, "every name must appear exactly once");
        }
    }
}
