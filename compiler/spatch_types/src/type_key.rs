//! `TypeKey`: the canonical identifier of a concrete type.
//!
//! Formed as `module_path ":" qualified_name` (`spec.md` §3). Equality and
//! hashing are defined over that string, but every `TypeKey` is interned
//! through a single process-wide [`StringInterner`] so comparisons on the
//! dispatch hot path are a `u32` compare rather than a string compare.

use spatch_intern::{SharedInterner, Sym};
use std::fmt;
use std::sync::OnceLock;

/// The interner backing every `TypeKey` in the process.
///
/// A single global instance (rather than one per `Registry`) is required
/// so that `TypeKey`s produced by independent registries — or by a
/// backend's own crate resolving its own types — still compare equal when
/// they name the same `module:qualname` string.
fn interner() -> &'static SharedInterner {
    static INTERNER: OnceLock<SharedInterner> = OnceLock::new();
    INTERNER.get_or_init(SharedInterner::new)
}

/// Canonical identifier of a concrete type: `module_path:qualified_name`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TypeKey(Sym);

impl TypeKey {
    /// Build a `TypeKey` from an already-formed `"module:qualname"` string.
    pub fn from_qualified(qualified: &str) -> Self {
        TypeKey(interner().intern(qualified))
    }

    /// Build a `TypeKey` from separate module path and qualified name parts.
    pub fn new(module_path: &str, qualname: &str) -> Self {
        Self::from_qualified(&format!("{module_path}:{qualname}"))
    }

    /// The `"module:qualname"` string this key denotes.
    pub fn as_str(self) -> &'static str {
        interner().lookup_static(self.0)
    }

    /// Split into `(module_path, qualname)`, if the key is well-formed.
    pub fn split(self) -> Option<(&'static str, &'static str)> {
        self.as_str().split_once(':')
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.as_str())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_intern_to_equal_keys() {
        let a = TypeKey::new("m", "Int");
        let b = TypeKey::from_qualified("m:Int");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "m:Int");
    }

    #[test]
    fn distinct_strings_are_distinct_keys() {
        let a = TypeKey::new("m", "Int");
        let b = TypeKey::new("m", "Float");
        assert_ne!(a, b);
    }

    #[test]
    fn split_recovers_module_and_qualname() {
        let key = TypeKey::new("numpy.core", "ndarray");
        assert_eq!(key.split(), Some(("numpy.core", "ndarray")));
    }
}
