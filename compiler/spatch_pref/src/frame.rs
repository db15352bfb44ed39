//! `Frame`: one scope's worth of preference overrides (`spec.md` §3
//! `PreferenceState`).

use crate::trace::TraceSink;
use spatch_types::TypeKey;
use std::sync::Arc;

/// One scope's (or the process-global frame's) preference overrides,
/// before collapsing against the rest of the stack.
#[derive(Clone, Default)]
pub struct Frame {
    pub(crate) prioritize: Vec<String>,
    pub(crate) forced_type: Option<TypeKey>,
    pub(crate) trace: Option<Arc<dyn TraceSink>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prioritize(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.prioritize = names.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_forced_type(mut self, type_key: TypeKey) -> Self {
        self.forced_type = Some(type_key);
        self
    }

    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }
}
