//! Dispatch-time errors (`spec.md` §7 `NoBackend`, `ImplementationError`).

use spatch_pref::Outcome;
use spatch_types::TypeKey;
use std::fmt;

/// One backend the engine considered for a call that exhausted every
/// candidate, with the outcome it produced (`spec.md` §7 `NoBackend`).
#[derive(Clone, Debug)]
pub struct ConsideredBackend {
    pub name: String,
    pub outcome: Outcome,
}

/// Dispatch exhausted every candidate: all deferred, or none matched the
/// call's type multiset (`spec.md` §7).
#[derive(Clone, Debug)]
pub struct NoBackend {
    pub function_id: String,
    pub type_keys: Vec<TypeKey>,
    pub considered: Vec<ConsideredBackend>,
}

impl fmt::Display for NoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no backend accepted {} for types {:?} (considered: {:?})",
            self.function_id, self.type_keys, self.considered
        )
    }
}

impl std::error::Error for NoBackend {}

/// An error raised by a chosen implementation itself. The engine never
/// wraps or inspects it, only records the outcome and re-raises
/// (`spec.md` §4.6 step 4, §7).
///
/// Rust's generic dispatch boundary needs one concrete error type per
/// `Dispatchable`, so backend implementations return
/// `Result<Out, ImplementationError>` rather than an arbitrary error
/// type; `ImplementationError` wraps whatever the implementation raised
/// as a boxed `std::error::Error` and passes it through unchanged.
#[derive(Debug)]
pub struct ImplementationError(pub Box<dyn std::error::Error + Send + Sync>);

impl ImplementationError {
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ImplementationError(Box::new(source))
    }
}

impl fmt::Display for ImplementationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ImplementationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// The full error surface a dispatched call can raise.
#[derive(Debug)]
pub enum DispatchError {
    NoBackend(NoBackend),
    Implementation(ImplementationError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoBackend(e) => write!(f, "{e}"),
            DispatchError::Implementation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::NoBackend(e) => Some(e),
            DispatchError::Implementation(e) => Some(e),
        }
    }
}

/// A locator could not be resolved to a loaded symbol (`spec.md` §9
/// "Dynamic symbol resolution").
#[derive(Clone, Debug)]
pub struct ResolveError(pub String);

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to resolve symbol: {}", self.0)
    }
}

impl std::error::Error for ResolveError {}

impl From<ResolveError> for DispatchError {
    fn from(e: ResolveError) -> Self {
        // A resolution failure is itself an implementation-boundary
        // failure from the caller's perspective: the backend is
        // unusable for this call.
        DispatchError::Implementation(ImplementationError::new(ResolveErrorAsError(e)))
    }
}

#[derive(Debug)]
struct ResolveErrorAsError(ResolveError);

impl fmt::Display for ResolveErrorAsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ResolveErrorAsError {}
