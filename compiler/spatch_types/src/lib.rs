//! Type identity for the dispatch engine.
//!
//! Covers `spec.md` §3's `TypeKey`/`TypeSpec` data model and §4.1's
//! matching rules: exact, subclass, and abstract-base (tri-valued hook)
//! specs, plus collecting the dispatched-argument type multiset.

mod abstract_hook;
mod spec;
mod type_key;
mod value;

pub use abstract_hook::{AbstractAnswer, AbstractHook, AbstractRegistry};
pub use spec::{TypeSpec, TypeSpecError};
pub use type_key::TypeKey;
pub use value::{collect_type_multiset, DispatchValue};
