//! A backend package's local implementation registry (`spec.md` §4.8).

use crate::entry::AuthoringEntry;
use rustc_hash::FxHashMap;

/// Accumulates one backend's `(library_function_id, local_implementation,
/// should_run?, uses_context?)` tuples, out of the runtime hot path — this
/// registry never participates in dispatch; it only feeds
/// [`crate::rewrite::rewrite_functions`].
pub struct AuthoringRegistry {
    entries: FxHashMap<String, AuthoringEntry>,
}

impl AuthoringRegistry {
    pub fn new() -> Self {
        AuthoringRegistry {
            entries: FxHashMap::default(),
        }
    }

    /// Register (or replace) this backend's implementation of one library
    /// function. Later registrations for the same function id win, matching
    /// `spec.md` §3's "last one wins" duplicate-entry-point convention.
    pub fn register(&mut self, entry: AuthoringEntry) -> &mut Self {
        self.entries.insert(entry.library_function_id.clone(), entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in a stable, sorted-by-function-id order, so the rewritten
    /// declaration file's diff is deterministic across runs.
    pub fn entries(&self) -> Vec<&AuthoringEntry> {
        let mut out: Vec<&AuthoringEntry> = self.entries.values().collect();
        out.sort_by(|a, b| a.library_function_id.cmp(&b.library_function_id));
        out
    }
}

impl Default for AuthoringRegistry {
    fn default() -> Self {
        Self::new()
    }
}
