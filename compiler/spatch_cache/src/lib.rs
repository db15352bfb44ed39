//! Concurrent memoization of per-call candidate plans (`spec.md` §4.5).

mod cache;
mod key;
mod plan;

pub use cache::DispatchCache;
pub use key::CacheKey;
pub use plan::{CandidatePlan, PlanEntry};
