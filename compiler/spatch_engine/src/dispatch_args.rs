//! `DispatchArgs`: how a call's arguments expose the type information the
//! engine matches against (`spec.md` §4.1, §4.7).
//!
//! `spec.md`'s source language resolves `dispatched_params` (parameter
//! *names*) to positions at registration time via runtime reflection over
//! the default implementation's signature. Rust has no such reflection,
//! so the adaptation made here is that the host's `Args` type states its
//! own dispatched type chains directly; `dispatched_params` survives only
//! as registration metadata for introspection (`spec.md` §4.7).

use smallvec::SmallVec;
use spatch_types::{DispatchValue, TypeKey};

/// One call's dispatched-argument type chains, concrete type first,
/// deduplicated by concrete `TypeKey` (`spec.md` §4.1 `collect_type_multiset`,
/// generalized to carry ancestor chains through to `TypeSpec::matches`).
pub trait DispatchArgs {
    fn dispatched_chains(&self) -> SmallVec<[SmallVec<[TypeKey; 4]>; 4]>;
}

/// Build dispatched chains from a slice of dispatched values directly,
/// the common case for a host library whose types implement
/// [`DispatchValue`].
pub fn chains_from_values<'a>(values: &[&'a dyn DispatchValue]) -> SmallVec<[SmallVec<[TypeKey; 4]>; 4]> {
    let mut out: SmallVec<[SmallVec<[TypeKey; 4]>; 4]> = SmallVec::new();
    for value in values {
        let chain = value.type_chain();
        if !out.iter().any(|existing| existing.first() == chain.first()) {
            out.push(chain);
        }
    }
    out
}

/// The concrete `TypeKey` multiset (chain heads only) used as the cache
/// key's type component (`spec.md` §3 `Dispatch Cache Key`).
pub fn multiset_heads(chains: &[SmallVec<[TypeKey; 4]>]) -> Vec<TypeKey> {
    chains.iter().filter_map(|c| c.first().copied()).collect()
}
