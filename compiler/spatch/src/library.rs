//! `Library`: bundles one host library's registry, abstract-type hooks,
//! and dispatch cache behind the shared-resource lifetimes
//! `make_dispatchable` needs (`spec.md` §4.7, §5 "Shared resources").

use crate::opts::BackendOpts;
use parking_lot::RwLock;
use spatch_cache::DispatchCache;
use spatch_engine::{make_dispatchable, Dispatchable, DispatchArgs, ImplFn, SymbolResolver};
use spatch_loader::{EntryPointSource, Loader};
use spatch_registry::{BrokenBackend, Registry};
use spatch_types::AbstractRegistry;
use std::sync::Arc;

/// A dispatch library instance: one registry, one abstract-type registry,
/// one dispatch cache. A process may host more than one `Library` (for
/// more than one dispatchable-function namespace) without their caches or
/// preference scopes interfering, since each owns its own `Registry`.
pub struct Library {
    registry: Arc<RwLock<Registry>>,
    abstracts: Arc<AbstractRegistry>,
    cache: Arc<DispatchCache>,
}

impl Library {
    /// Build a library's registry from `loader`'s entry points, reading
    /// `<prefix>_BLOCK`/`<prefix>_SET_ORDER` from the environment
    /// (`spec.md` §6). Returns the broken backends isolated during build
    /// alongside the library, for the host to log or surface.
    pub fn build<S: EntryPointSource>(
        loader: &Loader<S>,
        prefix: &str,
        allow_post_init_registration: bool,
    ) -> (Self, Vec<BrokenBackend>) {
        let (registry, broken) = Registry::build(loader, prefix, allow_post_init_registration);
        let library = Library {
            registry: Arc::new(RwLock::new(registry)),
            abstracts: Arc::new(AbstractRegistry::new()),
            cache: Arc::new(DispatchCache::new()),
        };
        (library, broken)
    }

    /// Register an abstract-type membership hook (`spec.md` §4.1's
    /// tri-valued abstract-base matching), e.g. for `numbers.Integral`-like
    /// virtual base classes this library's backends key off of.
    pub fn register_abstract_hook(&self, base: spatch_types::TypeKey, hook: Arc<dyn spatch_types::AbstractHook>) {
        self.abstracts.register(base, hook);
    }

    /// Register a dispatchable function (`spec.md` §4.7 `make_dispatchable`).
    pub fn dispatchable<Args, Out>(
        &self,
        function_id: impl Into<String>,
        dispatched_params: Vec<String>,
        default_impl: Arc<ImplFn<Args, Out>>,
        resolver: Arc<dyn SymbolResolver<Args, Out>>,
    ) -> Dispatchable<Args, Out>
    where
        Args: Clone + DispatchArgs + 'static,
        Out: 'static,
    {
        make_dispatchable(
            function_id,
            dispatched_params,
            default_impl,
            Arc::clone(&self.registry),
            Arc::clone(&self.abstracts),
            Arc::clone(&self.cache),
            resolver,
        )
    }

    /// Open a preference scope over this library's registered backends
    /// (`spec.md` §4.4, §6 `backend_opts`).
    pub fn backend_opts(&self) -> BackendOpts<'_> {
        BackendOpts::new(&self.registry)
    }

    /// Force a priority-resolution rebuild and drop every cached plan;
    /// needed after post-init `register()` (`spec.md` §5 "Shared
    /// resources").
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    pub fn registry(&self) -> &Arc<RwLock<Registry>> {
        &self.registry
    }
}
