//! `CacheKey`: `(function_id, sorted_type_keys, preference_fingerprint)`
//! (`spec.md` §3 `Dispatch Cache Key`).

use spatch_pref::PreferenceFingerprint;
use spatch_types::TypeKey;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CacheKey {
    function_id: String,
    type_keys: Vec<TypeKey>,
    fingerprint: PreferenceFingerprint,
}

impl CacheKey {
    /// `type_multiset` need not be pre-sorted; this normalizes it so that
    /// the same set of types always hashes to the same key regardless of
    /// discovery order (`spec.md` §3).
    pub fn new(function_id: &str, type_multiset: &[TypeKey], fingerprint: PreferenceFingerprint) -> Self {
        let mut type_keys: Vec<TypeKey> = type_multiset.to_vec();
        type_keys.sort_by_key(|k| k.as_str());
        type_keys.dedup();
        CacheKey {
            function_id: function_id.to_owned(),
            type_keys,
            fingerprint,
        }
    }
}
