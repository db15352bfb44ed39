//! Sharded string interning used on the dispatch engine's hot path.
//!
//! `TypeKey`s and function ids are compared on every dispatched call
//! (`spec.md` §1, §5). Interning them once to a `Sym` turns repeated
//! comparisons into `u32` equality instead of string hashing.

mod interner;
mod sym;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use sym::Sym;
