//! Trace sinks: the append-only record of per-call backend outcomes
//! (`spec.md` §3 `PreferenceState.trace`, §4.6).

use std::fmt;

/// What happened when the engine tried one backend for one call.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    Called,
    Deferred,
    Errored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Called => "called",
            Outcome::Deferred => "deferred",
            Outcome::Errored => "errored",
        })
    }
}

/// One dispatched call's full per-backend outcome list (`spec.md` §4.6).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TraceRecord {
    pub function_id: String,
    pub outcomes: Vec<(String, Outcome)>,
}

/// Receives trace records. Must be thread-safe: the engine appends
/// without holding any of its own locks (`spec.md` §5).
pub trait TraceSink: Send + Sync {
    fn record(&self, record: TraceRecord);
}

/// A `TraceSink` that stores every record in-process, for tests and
/// simple introspection use.
#[derive(Default)]
pub struct VecTraceSink {
    records: parking_lot::Mutex<Vec<TraceRecord>>,
}

impl VecTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }
}

impl TraceSink for VecTraceSink {
    fn record(&self, record: TraceRecord) {
        self.records.lock().push(record);
    }
}
