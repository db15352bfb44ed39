//! Abstract-base-class matching via a registered subclass hook.
//!
//! `spec.md` §4.1 / §9: an `@`-prefixed `TypeSpec` matches when the value's
//! concrete type answers `yes` to the named abstract base's subclass hook.
//! `unknown` routes as no-match but is never treated as an error — the
//! abstract type may simply not know about types outside its own ecosystem.

use crate::TypeKey;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Tri-valued answer from an abstract base's subclass hook.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AbstractAnswer {
    /// The candidate is a registered descendant of the abstract base.
    Yes,
    /// The candidate is known not to descend from the abstract base.
    No,
    /// The hook cannot decide (e.g. the candidate type is foreign).
    Unknown,
}

impl AbstractAnswer {
    /// `Yes` is the only answer that counts as a match; `Unknown` is
    /// deliberately folded into "no match" here (`spec.md` §4.1).
    pub fn is_match(self) -> bool {
        matches!(self, AbstractAnswer::Yes)
    }
}

/// A predicate exposed by an abstract base type, deciding whether a
/// concrete type descends from it.
pub trait AbstractHook: Send + Sync {
    /// Ask whether `candidate` is a registered descendant of this base.
    fn is_descendant(&self, candidate: TypeKey) -> AbstractAnswer;
}

/// Registry of abstract base types reachable by `@`-prefixed `TypeSpec`s.
///
/// Populated at registry-build time (`spec.md` §4.3 step 1): an `@m:n`
/// spec requires that `m:n` be importable, which in this engine means a
/// hook for it must already be registered here before the backend that
/// declares it is loaded.
#[derive(Clone, Default)]
pub struct AbstractRegistry {
    hooks: Arc<RwLock<FxHashMap<TypeKey, Arc<dyn AbstractHook>>>>,
}

impl AbstractRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the subclass hook for an abstract base type.
    pub fn register(&self, base: TypeKey, hook: Arc<dyn AbstractHook>) {
        self.hooks.write().insert(base, hook);
    }

    /// Whether a hook is registered for `base` — this is the "importable"
    /// check `spec.md` §3 requires before an abstract `TypeSpec` is usable.
    pub fn is_registered(&self, base: TypeKey) -> bool {
        self.hooks.read().contains_key(&base)
    }

    /// Ask the registered hook for `base` whether `candidate` descends
    /// from it. Returns `Unknown` if no hook is registered.
    pub fn ask(&self, base: TypeKey, candidate: TypeKey) -> AbstractAnswer {
        match self.hooks.read().get(&base) {
            Some(hook) => hook.is_descendant(candidate),
            None => AbstractAnswer::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyExact(TypeKey);

    impl AbstractHook for OnlyExact {
        fn is_descendant(&self, candidate: TypeKey) -> AbstractAnswer {
            if candidate == self.0 {
                AbstractAnswer::Yes
            } else {
                AbstractAnswer::No
            }
        }
    }

    #[test]
    fn unregistered_base_answers_unknown() {
        let reg = AbstractRegistry::new();
        let base = TypeKey::new("numbers", "Number");
        let candidate = TypeKey::new("builtins", "int");
        assert_eq!(reg.ask(base, candidate), AbstractAnswer::Unknown);
        assert!(!reg.ask(base, candidate).is_match());
    }

    #[test]
    fn registered_hook_is_consulted() {
        let reg = AbstractRegistry::new();
        let base = TypeKey::new("numbers", "Number");
        let int_key = TypeKey::new("builtins", "int");
        let str_key = TypeKey::new("builtins", "str");
        reg.register(base, Arc::new(OnlyExact(int_key)));

        assert!(reg.ask(base, int_key).is_match());
        assert!(!reg.ask(base, str_key).is_match());
        assert!(reg.is_registered(base));
    }
}
