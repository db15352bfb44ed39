//! Runtime type identity for dispatched argument values.
//!
//! Rust has no universal runtime type tag, so a value that can take part
//! in dispatch must say so itself: its concrete `TypeKey` plus its
//! inheritance chain up to the root (`spec.md` §4.1). Most callers only
//! need [`TypeKey::new`] plus an empty chain (no ancestors); the chain
//! exists for host libraries that model a class hierarchy on top of their
//! dispatched types.

use crate::TypeKey;
use smallvec::SmallVec;

/// A value that can be matched against a [`crate::TypeSpec`].
///
/// `ancestors()` lists the chain from (but not including) the concrete
/// type up to the root, closest ancestor first. Types with no modeled
/// hierarchy return an empty slice.
pub trait DispatchValue {
    /// The value's own concrete `TypeKey`.
    fn type_key(&self) -> TypeKey;

    /// Ancestor keys, closest first, excluding `type_key()` itself.
    fn ancestors(&self) -> &[TypeKey] {
        &[]
    }

    /// The full inheritance chain, concrete type first.
    fn type_chain(&self) -> SmallVec<[TypeKey; 4]> {
        let mut chain = SmallVec::new();
        chain.push(self.type_key());
        chain.extend(self.ancestors().iter().copied());
        chain
    }
}

/// Collect the unique `TypeKey`s of the dispatched argument values.
///
/// `spec.md` §4.1: unique by `TypeKey` equality, not by value identity;
/// types of non-dispatched arguments must never reach this function —
/// filtering to dispatched positions is `spatch_engine`'s job
/// (`spec.md` §4.7), not this one's.
pub fn collect_type_multiset<'a, I>(dispatched: I) -> SmallVec<[TypeKey; 4]>
where
    I: IntoIterator<Item = &'a dyn DispatchValue>,
{
    let mut out: SmallVec<[TypeKey; 4]> = SmallVec::new();
    for value in dispatched {
        let key = value.type_key();
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(TypeKey, Vec<TypeKey>);

    impl DispatchValue for Fixed {
        fn type_key(&self) -> TypeKey {
            self.0
        }
        fn ancestors(&self) -> &[TypeKey] {
            &self.1
        }
    }

    #[test]
    fn multiset_dedups_by_type_key() {
        let int_key = TypeKey::new("builtins", "int");
        let a = Fixed(int_key, vec![]);
        let b = Fixed(int_key, vec![]);
        let values: Vec<&dyn DispatchValue> = vec![&a, &b];

        let multiset = collect_type_multiset(values);
        assert_eq!(multiset.len(), 1);
        assert_eq!(multiset[0], int_key);
    }

    #[test]
    fn multiset_keeps_distinct_types() {
        let int_key = TypeKey::new("builtins", "int");
        let float_key = TypeKey::new("builtins", "float");
        let a = Fixed(int_key, vec![]);
        let b = Fixed(float_key, vec![]);
        let values: Vec<&dyn DispatchValue> = vec![&a, &b];

        let multiset = collect_type_multiset(values);
        assert_eq!(multiset.len(), 2);
    }

    #[test]
    fn type_chain_puts_concrete_type_first() {
        let bool_key = TypeKey::new("builtins", "bool");
        let int_key = TypeKey::new("builtins", "int");
        let value = Fixed(bool_key, vec![int_key]);
        let chain = value.type_chain();
        assert_eq!(chain.as_slice(), &[bool_key, int_key]);
    }
}
