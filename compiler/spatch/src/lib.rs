//! Public facade: the surface a host library re-exports under its own
//! names (`spec.md` §4.7, §6).
//!
//! A host library depends on this crate, implements
//! [`spatch_loader::EntryPointSource`] for however it discovers installed
//! backend packages, builds a [`Library`], registers its dispatchable
//! functions through it, and re-exports [`backend_opts`] (via
//! [`Library::backend_opts`]) under its own name.

mod library;
mod opts;

pub use library::Library;
pub use opts::BackendOpts;

pub use spatch_authoring::{rewrite_functions, AuthoringEntry, AuthoringRegistry, RewriteError};
pub use spatch_cache::{CacheKey, CandidatePlan, DispatchCache, PlanEntry};
pub use spatch_decl::{BackendDecl, ConfigError, FunctionBinding, FunctionId};
pub use spatch_engine::{
    chains_from_values, make_dispatchable, multiset_heads, build_plan, ConsideredBackend, Decision,
    DispatchArgs, DispatchContext, DispatchError, Dispatchable, ImplFn, ImplementationError,
    NoBackend, ResolveError, ShouldRunFn, SymbolResolver,
};
pub use spatch_loader::{EntryPointEntry, EntryPointSource, LoadError, Loader, SourceError};
pub use spatch_pref::{
    current, disable_global, enable_globally, open, Frame, Outcome, PreferenceFingerprint,
    PreferenceState, Scope, TraceRecord, TraceSink, VecTraceSink,
};
pub use spatch_registry::{Backend, BrokenBackend, CycleDiagnostic, Edge, EdgeSource, Registry, RegistryFrozen, DEFAULT_BACKEND};
pub use spatch_types::{
    collect_type_multiset, AbstractAnswer, AbstractHook, AbstractRegistry, DispatchValue, TypeKey, TypeSpec,
    TypeSpecError,
};
