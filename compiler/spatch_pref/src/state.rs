//! The active preference stack: thread-local scopes plus one process-wide
//! base frame (`spec.md` §4.4).

use crate::fingerprint::PreferenceFingerprint;
use crate::frame::Frame;
use crate::trace::TraceSink;
use rustc_hash::FxHashSet;
use spatch_registry::Registry;
use spatch_types::TypeKey;
use std::cell::RefCell;
use std::sync::Arc;

static GLOBAL_FRAME: parking_lot::Mutex<Option<Arc<Frame>>> = parking_lot::Mutex::new(None);

thread_local! {
    static STACK: RefCell<Vec<Arc<Frame>>> = const { RefCell::new(Vec::new()) };
}

/// The effective, collapsed preference state at a point in time
/// (`spec.md` §3). Immutable once returned by [`current`].
#[derive(Clone)]
pub struct PreferenceState {
    pub prioritize: Vec<String>,
    pub forced_type: Option<TypeKey>,
    pub trace: Option<Arc<dyn TraceSink>>,
}

impl PreferenceState {
    /// The cache-relevant summary of this state (`spec.md` §3).
    pub fn fingerprint(&self) -> PreferenceFingerprint {
        PreferenceFingerprint {
            prioritize: self.prioritize.clone(),
            forced_type: self.forced_type,
        }
    }
}

/// A handle to an open preference scope. Dropping it pops the scope; the
/// stack must be used in strict LIFO order, the same discipline the
/// integrator's scoped-resource idiom enforces at the call site
/// (`spec.md` §9 "Scoped state").
pub struct Scope {
    frame: Arc<Frame>,
}

impl Drop for Scope {
    fn drop(&mut self) {
        STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Open a new preference scope on the current thread, filtering
/// `frame.prioritize` to names the registry actually knows about
/// (`spec.md` §4.4: unknown names are silently ignored).
pub fn open(registry: &Registry, frame: Frame) -> Scope {
    let filtered = Frame {
        prioritize: frame
            .prioritize
            .into_iter()
            .filter(|name| registry.backend(name).is_some())
            .collect(),
        forced_type: frame.forced_type,
        trace: frame.trace,
    };
    let arc = Arc::new(filtered);
    STACK.with(|stack| stack.borrow_mut().push(arc.clone()));
    Scope { frame: arc }
}

/// Promote `scope`'s frame to the process-wide base frame. Replaces any
/// previously promoted frame; only one global frame exists at a time
/// (`spec.md` §4.4).
pub fn enable_globally(scope: &Scope) {
    *GLOBAL_FRAME.lock() = Some(scope.frame.clone());
}

/// Clear the process-wide base frame, if any.
pub fn disable_global() {
    *GLOBAL_FRAME.lock() = None;
}

/// Collapse the current thread's scope stack plus the global frame into
/// one effective `PreferenceState` (`spec.md` §3, §4.4).
///
/// `type`/`trace` come from the topmost frame that sets them, scanning
/// innermost scope first, global frame last. `prioritize` lists
/// concatenate innermost-first, deduplicated by first occurrence.
pub fn current() -> PreferenceState {
    let global = GLOBAL_FRAME.lock().clone();
    STACK.with(|stack| {
        let stack = stack.borrow();
        let mut prioritize = Vec::new();
        let mut seen = FxHashSet::default();
        let mut forced_type = None;
        let mut trace: Option<Arc<dyn TraceSink>> = None;

        for frame in stack.iter().rev() {
            if forced_type.is_none() {
                forced_type = frame.forced_type;
            }
            if trace.is_none() {
                trace = frame.trace.clone();
            }
            for name in &frame.prioritize {
                if seen.insert(name.clone()) {
                    prioritize.push(name.clone());
                }
            }
        }

        if let Some(g) = &global {
            if forced_type.is_none() {
                forced_type = g.forced_type;
            }
            if trace.is_none() {
                trace = g.trace.clone();
            }
            for name in &g.prioritize {
                if seen.insert(name.clone()) {
                    prioritize.push(name.clone());
                }
            }
        }

        PreferenceState {
            prioritize,
            forced_type,
            trace,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Outcome, TraceRecord, VecTraceSink};
    use spatch_decl::BackendDecl;
    use spatch_loader::{EntryPointEntry, EntryPointSource, Loader, SourceError};

    struct EmptySource;
    impl EntryPointSource for EmptySource {
        fn group(&self) -> &str {
            "test"
        }
        fn entries(&self) -> Result<Vec<EntryPointEntry>, SourceError> {
            Ok(vec![])
        }
        fn read(&self, _locator: &str) -> Result<String, SourceError> {
            Err(SourceError("no entries".to_owned()))
        }
    }

    fn test_registry() -> Registry {
        let loader = Loader::new(EmptySource, []);
        let (mut registry, _) = Registry::build(&loader, "TESTPREF", true);
        registry
            .register(BackendDecl::parse("b1.toml", "name = \"b1\"", "b1").unwrap())
            .unwrap();
        registry
            .register(BackendDecl::parse("b2.toml", "name = \"b2\"", "b2").unwrap())
            .unwrap();
        registry
    }

    #[test]
    fn scope_isolation_restores_prior_state_on_drop() {
        let registry = test_registry();
        let before = current().prioritize;
        {
            let _scope = open(&registry, Frame::new().with_prioritize(["b1".to_owned()]));
            assert_eq!(current().prioritize, vec!["b1".to_owned()]);
        }
        assert_eq!(current().prioritize, before);
    }

    #[test]
    fn nested_scopes_concatenate_innermost_first_deduped() {
        let registry = test_registry();
        let _outer = open(
            &registry,
            Frame::new().with_prioritize(["b2".to_owned(), "b1".to_owned()]),
        );
        {
            let _inner = open(&registry, Frame::new().with_prioritize(["b1".to_owned()]));
            assert_eq!(current().prioritize, vec!["b1".to_owned(), "b2".to_owned()]);
        }
        assert_eq!(current().prioritize, vec!["b2".to_owned(), "b1".to_owned()]);
    }

    #[test]
    fn unknown_names_are_silently_dropped() {
        let registry = test_registry();
        let _scope = open(
            &registry,
            Frame::new().with_prioritize(["nonexistent".to_owned(), "b1".to_owned()]),
        );
        assert_eq!(current().prioritize, vec!["b1".to_owned()]);
    }

    #[test]
    fn innermost_trace_and_forced_type_win() {
        let registry = test_registry();
        let outer_sink = Arc::new(VecTraceSink::new());
        let _outer = open(&registry, Frame::new().with_trace(outer_sink.clone()));
        let inner_sink = Arc::new(VecTraceSink::new());
        {
            let _inner = open(&registry, Frame::new().with_trace(inner_sink.clone()));
            let state = current();
            state.trace.unwrap().record(TraceRecord {
                function_id: "lib:f".to_owned(),
                outcomes: vec![("b1".to_owned(), Outcome::Called)],
            });
        }
        assert_eq!(inner_sink.records().len(), 1);
        assert_eq!(outer_sink.records().len(), 0);
    }

    #[test]
    fn fingerprint_excludes_trace() {
        let state_a = PreferenceState {
            prioritize: vec!["b1".to_owned()],
            forced_type: None,
            trace: Some(Arc::new(VecTraceSink::new())),
        };
        let state_b = PreferenceState {
            prioritize: vec!["b1".to_owned()],
            forced_type: None,
            trace: None,
        };
        assert_eq!(state_a.fingerprint(), state_b.fingerprint());
    }
}
