//! `TypeSpec`: the three ways a backend can declare it accepts a type.
//!
//! `spec.md` §3: `"m:n"` (exact), `"~m:n"` (subclass), `"@m:n"` (abstract).

use crate::{AbstractRegistry, TypeKey};
use std::fmt;

/// One backend-declared type match specification.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeSpec {
    /// `"m:n"` — matches only the exact type.
    Exact(TypeKey),
    /// `"~m:n"` — matches the type or any of its ancestors' key.
    Subclass(TypeKey),
    /// `"@m:n"` — matches any registered descendant via the base's hook.
    Abstract(TypeKey),
}

/// A `TypeSpec` string failed to parse.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TypeSpecError(pub String);

impl fmt::Display for TypeSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed TypeSpec {:?}: expected \"m:n\", \"~m:n\" or \"@m:n\"", self.0)
    }
}

impl std::error::Error for TypeSpecError {}

impl TypeSpec {
    /// Parse a `TypeSpec` string. Does not check abstract-type
    /// importability; `Registry` build does that separately (`spec.md` §3).
    pub fn parse(s: &str) -> Result<Self, TypeSpecError> {
        let (rest, ctor): (&str, fn(TypeKey) -> TypeSpec) = if let Some(rest) = s.strip_prefix('~')
        {
            (rest, TypeSpec::Subclass)
        } else if let Some(rest) = s.strip_prefix('@') {
            (rest, TypeSpec::Abstract)
        } else {
            (s, TypeSpec::Exact)
        };

        let well_formed = matches!(rest.split_once(':'), Some((m, n)) if !m.is_empty() && !n.is_empty());
        if !well_formed {
            return Err(TypeSpecError(s.to_owned()));
        }

        Ok(ctor(TypeKey::from_qualified(rest)))
    }

    /// The `TypeKey` named by this spec, regardless of match kind.
    pub fn key(self) -> TypeKey {
        match self {
            TypeSpec::Exact(k) | TypeSpec::Subclass(k) | TypeSpec::Abstract(k) => k,
        }
    }

    /// Whether this spec requires a registered abstract hook to be usable.
    pub fn is_abstract(self) -> bool {
        matches!(self, TypeSpec::Abstract(_))
    }

    /// Does this spec match a concrete type whose inheritance chain (from
    /// the concrete type up to the root, concrete type first) is
    /// `type_chain`? `abstracts` resolves `@`-prefixed specs.
    pub fn matches(self, type_chain: &[TypeKey], abstracts: &AbstractRegistry) -> bool {
        match self {
            TypeSpec::Exact(key) => type_chain.first().is_some_and(|&t| t == key),
            TypeSpec::Subclass(key) => type_chain.contains(&key),
            TypeSpec::Abstract(base) => type_chain
                .first()
                .is_some_and(|&concrete| abstracts.ask(base, concrete).is_match()),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Exact(k) => write!(f, "{k}"),
            TypeSpec::Subclass(k) => write!(f, "~{k}"),
            TypeSpec::Abstract(k) => write!(f, "@{k}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_prefixes() {
        assert!(matches!(TypeSpec::parse("m:n"), Ok(TypeSpec::Exact(_))));
        assert!(matches!(TypeSpec::parse("~m:n"), Ok(TypeSpec::Subclass(_))));
        assert!(matches!(TypeSpec::parse("@m:n"), Ok(TypeSpec::Abstract(_))));
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(TypeSpec::parse("nocolon").is_err());
        assert!(TypeSpec::parse("~nocolon").is_err());
        assert!(TypeSpec::parse(":n").is_err());
        assert!(TypeSpec::parse("m:").is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for s in ["m:n", "~m:n", "@m:n"] {
            let spec = TypeSpec::parse(s).unwrap();
            assert_eq!(spec.to_string(), s);
        }
    }

    #[test]
    fn exact_matches_only_head_of_chain() {
        let int_key = TypeKey::new("builtins", "int");
        let bool_key = TypeKey::new("builtins", "bool");
        let spec = TypeSpec::Exact(int_key);
        let abstracts = AbstractRegistry::new();

        assert!(spec.matches(&[int_key], &abstracts));
        assert!(!spec.matches(&[bool_key, int_key], &abstracts));
    }

    #[test]
    fn subclass_matches_anywhere_in_chain() {
        let int_key = TypeKey::new("builtins", "int");
        let bool_key = TypeKey::new("builtins", "bool");
        let spec = TypeSpec::Subclass(int_key);
        let abstracts = AbstractRegistry::new();

        assert!(spec.matches(&[bool_key, int_key], &abstracts));
        assert!(!spec.matches(&[bool_key], &abstracts));
    }
}
