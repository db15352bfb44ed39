//! The cache-relevant summary of an effective preference state
//! (`spec.md` §3 `Dispatch Cache Key`).

use spatch_types::TypeKey;

/// Everything about a `PreferenceState` that can affect candidate
/// selection. Trace sinks are deliberately excluded: they have no
/// bearing on which backend is chosen (`spec.md` §3).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PreferenceFingerprint {
    pub prioritize: Vec<String>,
    pub forced_type: Option<TypeKey>,
}
