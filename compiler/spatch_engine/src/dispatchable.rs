//! `Dispatchable`: the library-facing callable a dispatchable function
//! registration returns (`spec.md` §4.6, §4.7).

use crate::context::{Decision, DispatchContext};
use crate::dispatch_args::{multiset_heads, DispatchArgs};
use crate::error::{ConsideredBackend, DispatchError, NoBackend};
use crate::plan_builder::build_plan;
use crate::resolver::{ImplFn, ShouldRunFn, SymbolResolver};
use dashmap::DashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use spatch_cache::{CacheKey, DispatchCache};
use spatch_decl::FunctionBinding;
use spatch_pref::{current, Outcome, PreferenceState, TraceRecord};
use spatch_registry::{Registry, DEFAULT_BACKEND};
use spatch_types::AbstractRegistry;
use std::sync::Arc;

/// The registered, callable form of one dispatchable function
/// (`spec.md` §4.7). Opaque to the engine's callers beyond `call` and
/// the introspection accessors; `function_id`/`dispatched_params` exist
/// for tooling, not for dispatch itself.
pub struct Dispatchable<Args, Out> {
    function_id: String,
    dispatched_params: Vec<String>,
    default_impl: Arc<ImplFn<Args, Out>>,
    registry: Arc<RwLock<Registry>>,
    abstracts: Arc<AbstractRegistry>,
    cache: Arc<DispatchCache>,
    resolver: Arc<dyn SymbolResolver<Args, Out>>,
    impl_symbols: DashMap<String, Arc<ImplFn<Args, Out>>>,
    should_run_symbols: DashMap<String, Arc<ShouldRunFn<Args>>>,
}

/// Register a dispatchable function, wiring its default implementation
/// into the `default` pseudo-backend (`spec.md` §4.7). `dispatched_params`
/// is the non-empty set of dispatched parameter names surfaced for
/// introspection; see [`crate::dispatch_args`] for why it no longer drives
/// type extraction directly.
pub fn make_dispatchable<Args, Out>(
    function_id: impl Into<String>,
    dispatched_params: Vec<String>,
    default_impl: Arc<ImplFn<Args, Out>>,
    registry: Arc<RwLock<Registry>>,
    abstracts: Arc<AbstractRegistry>,
    cache: Arc<DispatchCache>,
    resolver: Arc<dyn SymbolResolver<Args, Out>>,
) -> Dispatchable<Args, Out>
where
    Args: 'static,
    Out: 'static,
{
    let function_id = function_id.into();
    assert!(
        !dispatched_params.is_empty(),
        "dispatched_params must name at least one parameter (spec.md §4.7)"
    );

    registry.write().register_default_binding(
        function_id.clone(),
        FunctionBinding {
            implementation_ref: format!("__default__:{function_id}"),
            should_run: None,
            uses_context: false,
            additional_docs: None,
        },
    );

    Dispatchable {
        function_id,
        dispatched_params,
        default_impl,
        registry,
        abstracts,
        cache,
        resolver,
        impl_symbols: DashMap::new(),
        should_run_symbols: DashMap::new(),
    }
}

impl<Args, Out> Dispatchable<Args, Out> {
    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    pub fn dispatched_params(&self) -> &[String] {
        &self.dispatched_params
    }
}

impl<Args, Out> Dispatchable<Args, Out>
where
    Args: Clone + DispatchArgs + 'static,
    Out: 'static,
{
    /// Dispatch one call (`spec.md` §4.6): compute the type multiset,
    /// consult or build the candidate plan, then try candidates in order
    /// honoring `should_run` until one is called or the plan is
    /// exhausted.
    pub fn call(&self, args: Args) -> Result<Out, DispatchError> {
        let chains = args.dispatched_chains();
        let type_keys = multiset_heads(&chains);
        let pref = current();
        let forced_type = pref.forced_type;
        let fingerprint = pref.fingerprint();
        let prioritize = pref.prioritize.clone();

        let key = CacheKey::new(&self.function_id, &type_keys, fingerprint);
        let registry = Arc::clone(&self.registry);
        let abstracts = Arc::clone(&self.abstracts);
        let function_id = self.function_id.clone();
        let chains_for_build = chains.clone();
        let plan = self.cache.get_or_compute(key, move || {
            let reg = registry.read();
            let entries = build_plan(
                &reg,
                &function_id,
                &chains_for_build,
                forced_type,
                &abstracts,
                &prioritize,
            );
            Arc::new(entries)
        });

        let pref_arc = Arc::new(pref);
        let mut considered = Vec::new();

        for entry in plan.iter() {
            let ctx = DispatchContext::new(
                SmallVec::from_vec(type_keys.clone()),
                forced_type,
                entry.backend_name.clone(),
                Arc::clone(&pref_arc),
            );

            if let Some(locator) = &entry.binding.should_run {
                let should_run = self.resolve_should_run(locator)?;
                if (*should_run)(&ctx, &args) == Decision::Defer {
                    considered.push(ConsideredBackend {
                        name: entry.backend_name.clone(),
                        outcome: Outcome::Deferred,
                    });
                    continue;
                }
            }

            let implementation = if entry.backend_name == DEFAULT_BACKEND {
                Arc::clone(&self.default_impl)
            } else {
                self.resolve_impl(&entry.binding.implementation_ref)?
            };

            return match (*implementation)(&ctx, args.clone()) {
                Ok(out) => {
                    considered.push(ConsideredBackend {
                        name: entry.backend_name.clone(),
                        outcome: Outcome::Called,
                    });
                    self.emit_trace(&pref_arc, &considered);
                    Ok(out)
                }
                Err(e) => {
                    considered.push(ConsideredBackend {
                        name: entry.backend_name.clone(),
                        outcome: Outcome::Errored,
                    });
                    self.emit_trace(&pref_arc, &considered);
                    Err(DispatchError::Implementation(e))
                }
            };
        }

        self.emit_trace(&pref_arc, &considered);
        Err(DispatchError::NoBackend(NoBackend {
            function_id: self.function_id.clone(),
            type_keys,
            considered,
        }))
    }

    /// Compute the plan a call with these arguments would follow, without
    /// invoking anything (`spec.md` §9 "Introspection gaps").
    pub fn preview(&self, args: &Args) -> Vec<String> {
        let chains = args.dispatched_chains();
        let pref = current();
        let reg = self.registry.read();
        let plan = build_plan(
            &reg,
            &self.function_id,
            &chains,
            pref.forced_type,
            &self.abstracts,
            &pref.prioritize,
        );
        plan.into_iter().map(|entry| entry.backend_name).collect()
    }

    fn resolve_impl(&self, locator: &str) -> Result<Arc<ImplFn<Args, Out>>, DispatchError> {
        if let Some(existing) = self.impl_symbols.get(locator) {
            return Ok(Arc::clone(&existing));
        }
        tracing::trace!(locator, function_id = %self.function_id, "resolving implementation symbol");
        let resolved = self.resolver.resolve_impl(locator)?;
        self.impl_symbols.insert(locator.to_owned(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn resolve_should_run(&self, locator: &str) -> Result<Arc<ShouldRunFn<Args>>, DispatchError> {
        if let Some(existing) = self.should_run_symbols.get(locator) {
            return Ok(Arc::clone(&existing));
        }
        let resolved = self.resolver.resolve_should_run(locator)?;
        self.should_run_symbols.insert(locator.to_owned(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn emit_trace(&self, pref: &PreferenceState, considered: &[ConsideredBackend]) {
        if let Some(sink) = &pref.trace {
            sink.record(TraceRecord {
                function_id: self.function_id.clone(),
                outcomes: considered.iter().map(|c| (c.name.clone(), c.outcome)).collect(),
            });
        }
    }
}
