//! `SymbolResolver`: defers loading a backend's implementation code until
//! first call (`spec.md` §9 "Dynamic symbol resolution").
//!
//! Generic per `(Args, Out)` rather than one process-wide trait object:
//! every backend implementation of a given dispatchable shares that
//! dispatchable's exact signature, so the resolver for one `Dispatchable`
//! only ever needs to produce values of that one shape. Tests substitute
//! a fake resolver, exactly as `spec.md` suggests.

use crate::context::{Decision, DispatchContext};
use crate::error::{ImplementationError, ResolveError};
use std::sync::Arc;

/// A resolved implementation: called with the `DispatchContext` and the
/// call's arguments (`spec.md` §3 `FunctionBinding.implementation_ref`).
pub type ImplFn<Args, Out> = dyn Fn(&DispatchContext, Args) -> Result<Out, ImplementationError> + Send + Sync;

/// A resolved `should_run` predicate (`spec.md` §3 `FunctionBinding.should_run`).
pub type ShouldRunFn<Args> = dyn Fn(&DispatchContext, &Args) -> Decision + Send + Sync;

/// Resolves `"m:n"`-shaped locators from backend declarations into
/// callable values, lazily, on first use (`spec.md` §4.2, §4.6 step 4).
pub trait SymbolResolver<Args, Out>: Send + Sync {
    fn resolve_impl(&self, locator: &str) -> Result<Arc<ImplFn<Args, Out>>, ResolveError>;

    fn resolve_should_run(&self, locator: &str) -> Result<Arc<ShouldRunFn<Args>>, ResolveError>;
}
