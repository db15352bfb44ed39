//! Per-call dispatch: plan building, execution, and dispatchable
//! registration (`spec.md` §4.6, §4.7).

mod context;
mod dispatch_args;
mod dispatchable;
mod error;
mod plan_builder;
mod resolver;

pub use context::{Decision, DispatchContext};
pub use dispatch_args::{chains_from_values, multiset_heads, DispatchArgs};
pub use dispatchable::{make_dispatchable, Dispatchable};
pub use error::{ConsideredBackend, DispatchError, ImplementationError, NoBackend, ResolveError};
pub use plan_builder::build_plan;
pub use resolver::{ImplFn, ShouldRunFn, SymbolResolver};
