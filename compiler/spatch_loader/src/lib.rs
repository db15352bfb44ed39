//! Entry-point enumeration and lazy declaration-file loading (`spec.md` §4.2).
//!
//! This crate knows how to *find* backend declarations; `spatch_decl` owns
//! their shape. The split lets a host library swap in its own
//! [`EntryPointSource`] (a packaging index, a config directory, a test
//! double) without touching parsing or validation.

mod loader;
mod source;

pub use loader::{LoadError, Loader};
pub use source::{EntryPointEntry, EntryPointSource, SourceError};
