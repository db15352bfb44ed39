//! The backend set and its resolved priority order (`spec.md` §4.3).

mod backend;
mod error;
mod priority;
mod registry;

pub use backend::{Backend, DEFAULT_BACKEND};
pub use error::RegistryFrozen;
pub use priority::{CycleDiagnostic, Edge, EdgeSource};
pub use registry::{BrokenBackend, Registry};
