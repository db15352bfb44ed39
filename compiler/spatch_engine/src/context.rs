//! `DispatchContext`: what `should_run` and context-aware implementations
//! observe about the call in progress (`spec.md` §3 `DispatchContext`).

use smallvec::SmallVec;
use spatch_pref::PreferenceState;
use spatch_types::TypeKey;
use std::sync::Arc;

/// The call's type multiset, forced-type preference, the backend
/// currently being tried, and a read-only view of the active preference
/// state (`spec.md` §3).
#[derive(Clone)]
pub struct DispatchContext {
    type_multiset: SmallVec<[TypeKey; 4]>,
    forced_type: Option<TypeKey>,
    backend_name: String,
    preference: Arc<PreferenceState>,
}

impl DispatchContext {
    pub(crate) fn new(
        type_multiset: SmallVec<[TypeKey; 4]>,
        forced_type: Option<TypeKey>,
        backend_name: String,
        preference: Arc<PreferenceState>,
    ) -> Self {
        DispatchContext {
            type_multiset,
            forced_type,
            backend_name,
            preference,
        }
    }

    pub fn type_multiset(&self) -> &[TypeKey] {
        &self.type_multiset
    }

    pub fn forced_type(&self) -> Option<TypeKey> {
        self.forced_type
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn preference(&self) -> &PreferenceState {
        &self.preference
    }
}

/// `should_run`'s verdict: accept the call, or defer to the next
/// candidate (`spec.md` §3 `FunctionBinding.should_run`).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Decision {
    Run,
    Defer,
}
