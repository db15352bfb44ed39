//! `CandidatePlan`: the ordered, filtered list of backends the engine
//! will try for one cache key (`spec.md` §3, §4.5).

use spatch_decl::FunctionBinding;
use std::sync::Arc;

/// One candidate in a resolved plan.
#[derive(Clone, Debug)]
pub struct PlanEntry {
    pub backend_name: String,
    pub binding: FunctionBinding,
}

/// A plan is pure data computed deterministically from `(CacheKey,
/// registry state)`; invoking it never mutates the cache (`spec.md`
/// §4.5). Wrapped in `Arc` so a cache hit clones a pointer, not the list.
pub type CandidatePlan = Arc<Vec<PlanEntry>>;
