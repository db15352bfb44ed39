//! `backend_opts`: the user-facing preference-scope builder
//! (`spec.md` §6, §4.4).

use parking_lot::RwLock;
use spatch_pref::{open, Frame, Scope, TraceSink};
use spatch_registry::Registry;
use spatch_types::TypeKey;
use std::sync::Arc;

/// Builds and opens a preference scope against one library's registry.
///
/// `prioritize`/`forced_type`/`trace` mirror `spec.md` §6's
/// `backend_opts(prioritize=?, type=?, trace=?)`; `open()` returns the
/// scoped [`Scope`] guard, and [`open_and_enable_globally`] additionally
/// promotes it to the process-wide base frame in one call, for the
/// "explicit callable form" `spec.md` mentions as an alternative to the
/// scoped-acquisition idiom.
pub struct BackendOpts<'a> {
    registry: &'a RwLock<Registry>,
    frame: Frame,
}

impl<'a> BackendOpts<'a> {
    pub(crate) fn new(registry: &'a RwLock<Registry>) -> Self {
        BackendOpts {
            registry,
            frame: Frame::default(),
        }
    }

    #[must_use]
    pub fn prioritize(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.frame = self.frame.with_prioritize(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn type_(mut self, forced: TypeKey) -> Self {
        self.frame = self.frame.with_forced_type(forced);
        self
    }

    #[must_use]
    pub fn trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.frame = self.frame.with_trace(sink);
        self
    }

    /// Open the scope: guaranteed release (`spec.md` §6) happens when the
    /// returned [`Scope`] drops.
    #[must_use]
    pub fn open(self) -> Scope {
        let guard = self.registry.read();
        open(&guard, self.frame)
    }

    /// Open the scope and immediately promote it to the process-global
    /// base frame (`spec.md` §4.4 `enable_globally`).
    pub fn open_and_enable_globally(self) -> Scope {
        let scope = self.open();
        spatch_pref::enable_globally(&scope);
        scope
    }
}
