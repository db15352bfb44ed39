//! Scoped and process-global dispatch preference state (`spec.md` §4.4).

mod fingerprint;
mod frame;
mod state;
mod trace;

pub use fingerprint::PreferenceFingerprint;
pub use frame::Frame;
pub use state::{current, disable_global, enable_globally, open, PreferenceState, Scope};
pub use trace::{Outcome, TraceRecord, TraceSink, VecTraceSink};
