//! Candidate-plan construction (`spec.md` §4.6 steps 3a-3f).

use smallvec::SmallVec;
use spatch_cache::PlanEntry;
use spatch_registry::Registry;
use spatch_types::{AbstractRegistry, TypeKey};

/// Build the ordered, filtered candidate list for one call
/// (`spec.md` §4.6 step 3, edge cases).
pub fn build_plan(
    registry: &Registry,
    function_id: &str,
    chains: &[SmallVec<[TypeKey; 4]>],
    forced_type: Option<TypeKey>,
    abstracts: &AbstractRegistry,
    effective_prioritize: &[String],
) -> Vec<PlanEntry> {
    let candidates = registry.lookup(function_id);

    // Edge case (spec.md §4.6): zero dispatched args and no forced type
    // means only `default` runs, regardless of prioritize.
    if chains.is_empty() && forced_type.is_none() {
        return candidates
            .into_iter()
            .filter(|(backend, _)| backend.is_default())
            .map(|(backend, binding)| PlanEntry {
                backend_name: backend.name.clone(),
                binding: binding.clone(),
            })
            .collect();
    }

    let mut effective_chains: Vec<SmallVec<[TypeKey; 4]>> = chains.to_vec();
    if let Some(ft) = forced_type {
        if !effective_chains.iter().any(|c| c.first() == Some(&ft)) {
            let mut chain = SmallVec::new();
            chain.push(ft);
            effective_chains.push(chain);
        }
    }

    // Step 3b: keep only backends matching every distinct type in the
    // (possibly forced-type-augmented) multiset. `default` declares no
    // type specs at all and is exempt from this filter — it is always a
    // candidate when it has a binding, subject only to step 3e's ordering.
    let mut filtered: Vec<_> = candidates
        .into_iter()
        .filter(|(backend, _)| {
            backend.is_default()
                || effective_chains
                    .iter()
                    .all(|chain| backend.all_type_specs().any(|spec| spec.matches(chain, abstracts)))
        })
        .collect();

    // Step 3c: opt-in backends need an explicit reason to stay.
    filtered.retain(|(backend, _)| {
        if !backend.requires_opt_in {
            return true;
        }
        if effective_prioritize.iter().any(|name| name == &backend.name) {
            return true;
        }
        if let Some(ft) = forced_type {
            let solo_chain: SmallVec<[TypeKey; 4]> = SmallVec::from_slice(&[ft]);
            return backend
                .primary_types
                .iter()
                .any(|spec| spec.matches(&solo_chain, abstracts));
        }
        false
    });

    // Step 3d: reorder, effective prioritize first in list order.
    let mut prioritized = Vec::new();
    for name in effective_prioritize {
        if let Some(pos) = filtered.iter().position(|(backend, _)| &backend.name == name) {
            prioritized.push(filtered.remove(pos));
        }
    }
    prioritized.extend(filtered);

    // Step 3e: default last, iff present.
    if let Some(pos) = prioritized.iter().position(|(backend, _)| backend.is_default()) {
        if pos != prioritized.len() - 1 {
            let default_entry = prioritized.remove(pos);
            prioritized.push(default_entry);
        }
    }

    prioritized
        .into_iter()
        .map(|(backend, binding)| PlanEntry {
            backend_name: backend.name.clone(),
            binding: binding.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatch_decl::{BackendDecl, FunctionBinding};
    use spatch_loader::{EntryPointEntry, EntryPointSource, Loader, SourceError};

    struct FakeSource(Vec<(String, String)>);
    impl EntryPointSource for FakeSource {
        fn group(&self) -> &str {
            "test"
        }
        fn entries(&self) -> Result<Vec<EntryPointEntry>, SourceError> {
            Ok(self
                .0
                .iter()
                .map(|(name, _)| EntryPointEntry {
                    name: name.clone(),
                    locator: format!("{name}.toml"),
                })
                .collect())
        }
        fn read(&self, locator: &str) -> Result<String, SourceError> {
            self.0
                .iter()
                .find(|(name, _)| format!("{name}.toml") == locator)
                .map(|(_, text)| text.clone())
                .ok_or_else(|| SourceError("missing".to_owned()))
        }
    }

    fn build_registry(decls: Vec<(&str, &str)>) -> Registry {
        let source = FakeSource(
            decls
                .into_iter()
                .map(|(n, t)| (n.to_owned(), t.to_owned()))
                .collect(),
        );
        let loader = Loader::new(source, []);
        let (mut registry, _) = Registry::build(&loader, "TEST", true);
        registry.register_default_binding(
            "lib:divide".to_owned(),
            FunctionBinding {
                implementation_ref: "__default__".to_owned(),
                should_run: None,
                uses_context: false,
                additional_docs: None,
            },
        );
        registry
    }

    fn chain(key: TypeKey) -> SmallVec<[TypeKey; 4]> {
        SmallVec::from_slice(&[key])
    }

    #[test]
    fn zero_dispatched_args_only_runs_default() {
        let registry = build_registry(vec![(
            "b1",
            "name = \"b1\"\n[functions.\"lib:divide\"]\nfunction = \"b1:f\"",
        )]);
        let abstracts = AbstractRegistry::new();
        let plan = build_plan(&registry, "lib:divide", &[], None, &abstracts, &[]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].backend_name, "default");
    }

    #[test]
    fn backend_must_match_every_distinct_type() {
        let int_key = TypeKey::new("builtins", "int");
        let float_key = TypeKey::new("builtins", "float");
        let registry = build_registry(vec![(
            "b1",
            "name = \"b1\"\nprimary_types = [\"builtins:int\"]\nrequires_opt_in = false\n[functions.\"lib:divide\"]\nfunction = \"b1:f\"",
        )]);
        let abstracts = AbstractRegistry::new();
        let chains = vec![chain(int_key), chain(float_key)];
        let plan = build_plan(&registry, "lib:divide", &chains, None, &abstracts, &[]);
        assert!(plan.iter().all(|e| e.backend_name != "b1"));
    }

    #[test]
    fn opt_in_backend_excluded_without_prioritize_or_forced_type() {
        let int_key = TypeKey::new("builtins", "int");
        let registry = build_registry(vec![(
            "b1",
            "name = \"b1\"\nprimary_types = [\"builtins:int\"]\n[functions.\"lib:divide\"]\nfunction = \"b1:f\"",
        )]);
        let abstracts = AbstractRegistry::new();
        let chains = vec![chain(int_key)];
        let plan = build_plan(&registry, "lib:divide", &chains, None, &abstracts, &[]);
        assert!(plan.iter().all(|e| e.backend_name != "b1"));

        let plan_prioritized =
            build_plan(&registry, "lib:divide", &chains, None, &abstracts, &["b1".to_owned()]);
        assert_eq!(plan_prioritized[0].backend_name, "b1");
    }

    #[test]
    fn default_always_sorts_last() {
        let int_key = TypeKey::new("builtins", "int");
        let registry = build_registry(vec![(
            "b1",
            "name = \"b1\"\nprimary_types = [\"builtins:int\"]\nrequires_opt_in = false\n[functions.\"lib:divide\"]\nfunction = \"b1:f\"",
        )]);
        let abstracts = AbstractRegistry::new();
        let chains = vec![chain(int_key)];
        let plan = build_plan(&registry, "lib:divide", &chains, None, &abstracts, &["default".to_owned()]);
        assert_eq!(plan.last().unwrap().backend_name, "default");
    }

    // `spec.md` §8 determinism + default-last: for any mix of opt-in
    // backends, matching int or not, and any subset prioritized, building
    // the same plan twice from the same inputs always agrees, and
    // `default` is always last when it appears at all.
    proptest::proptest! {
        #[test]
        fn plan_is_deterministic_and_default_sorts_last(
            opt_in_flags in proptest::collection::vec(proptest::bool::ANY, 1..4),
            matches_int_flags in proptest::collection::vec(proptest::bool::ANY, 1..4),
            prioritize_b0 in proptest::bool::ANY,
        ) {
            let int_key = TypeKey::new("builtins", "int");
            let n = opt_in_flags.len().min(matches_int_flags.len());
            let decls: Vec<(String, String)> = (0..n)
                .map(|i| {
                    let opt_in = opt_in_flags[i];
                    let matches_int = matches_int_flags[i];
                    let primary = if matches_int { "primary_types = [\"builtins:int\"]\n" } else { "" };
                    let text = format!(
                        "name = \"b{i}\"\n{primary}requires_opt_in = {opt_in}\n[functions.\"lib:divide\"]\nfunction = \"b{i}:f\"\n"
                    );
                    (format!("b{i}"), text)
                })
                .collect();

            let registry = build_registry(decls.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect());
            let abstracts = AbstractRegistry::new();
            let chains = vec![chain(int_key)];
            let prioritize: Vec<String> = if prioritize_b0 && n > 0 { vec!["b0".to_owned()] } else { vec![] };

            let plan_a = build_plan(&registry, "lib:divide", &chains, None, &abstracts, &prioritize);
            let plan_b = build_plan(&registry, "lib:divide", &chains, None, &abstracts, &prioritize);

            let names_a: Vec<&str> = plan_a.iter().map(|e| e.backend_name.as_str()).collect();
            let names_b: Vec<&str> = plan_b.iter().map(|e| e.backend_name.as_str()).collect();
            proptest::prop_assert_eq!(names_a.clone(), names_b, "same inputs must yield the same plan");

            if let Some(pos) = names_a.iter().position(|&name| name == "default") {
                proptest::prop_assert_eq!(pos, names_a.len() - 1, "default must sort last when present");
            }

            if prioritize_b0 {
                if let Some(&first) = names_a.first() {
                    if names_a.contains(&"b0") {
                        proptest::prop_assert_eq!(first, "b0", "prioritized backend must lead when still a candidate");
                    }
                }
            }
        }
    }
}
