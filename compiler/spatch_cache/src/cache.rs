//! `DispatchCache`: concurrent memoization of candidate plans
//! (`spec.md` §4.5).

use crate::key::CacheKey;
use crate::plan::CandidatePlan;
use dashmap::DashMap;

/// Maps a [`CacheKey`] to its resolved [`CandidatePlan`]. Reads never
/// block writers and vice versa at the per-shard level `dashmap`
/// provides; insertion is racy-tolerant by construction (`spec.md` §4.5):
/// two threads computing the same key concurrently both insert, the last
/// write wins, and both plans are equal since a plan is a pure function
/// of the key and the registry.
#[derive(Default)]
pub struct DispatchCache {
    map: DashMap<CacheKey, CandidatePlan>,
}

impl DispatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<CandidatePlan> {
        self.map.get(key).map(|entry| entry.clone())
    }

    /// Return the cached plan for `key`, computing and inserting it via
    /// `build` on a miss. `build` may run redundantly under concurrent
    /// misses on the same key; that is expected and harmless.
    pub fn get_or_compute(&self, key: CacheKey, build: impl FnOnce() -> CandidatePlan) -> CandidatePlan {
        if let Some(plan) = self.get(&key) {
            return plan;
        }
        let plan = build();
        self.map.insert(key, plan.clone());
        plan
    }

    /// Bulk-clear on registry mutation (`spec.md` §3 `Lifecycle`, §4.5).
    /// No per-key invalidation is exposed, matching the spec.
    pub fn invalidate_all(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanEntry;
    use spatch_decl::FunctionBinding;
    use spatch_pref::PreferenceFingerprint;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn key(fn_id: &str) -> CacheKey {
        CacheKey::new(
            fn_id,
            &[],
            PreferenceFingerprint {
                prioritize: vec![],
                forced_type: None,
            },
        )
    }

    fn sample_plan() -> CandidatePlan {
        Arc::new(vec![PlanEntry {
            backend_name: "default".to_owned(),
            binding: FunctionBinding {
                implementation_ref: "lib:f_default".to_owned(),
                should_run: None,
                uses_context: false,
                additional_docs: None,
            },
        }])
    }

    #[test]
    fn miss_then_hit_returns_equal_plans() {
        let cache = DispatchCache::new();
        let k = key("lib:f");
        let built = AtomicUsize::new(0);
        let plan1 = cache.get_or_compute(k.clone(), || {
            built.fetch_add(1, Ordering::SeqCst);
            sample_plan()
        });
        let plan2 = cache.get_or_compute(k, || {
            built.fetch_add(1, Ordering::SeqCst);
            sample_plan()
        });
        assert_eq!(built.load(Ordering::SeqCst), 1, "second lookup must hit the cache");
        assert_eq!(plan1.len(), plan2.len());
    }

    #[test]
    fn invalidate_all_clears_every_entry() {
        let cache = DispatchCache::new();
        cache.get_or_compute(key("lib:f"), sample_plan);
        cache.get_or_compute(key("lib:g"), sample_plan);
        assert_eq!(cache.len(), 2);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
