//! Registry-level errors (`spec.md` §7 `RegistryFrozen`).

use std::fmt;

/// A mutation was attempted against a registry that does not permit
/// post-init registration (`spec.md` §4.3, §7).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RegistryFrozen;

impl fmt::Display for RegistryFrozen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("registry does not permit post-init backend registration")
    }
}

impl std::error::Error for RegistryFrozen {}
