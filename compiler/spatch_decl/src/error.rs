//! Declaration-file errors (`spec.md` §7 `ConfigError`).
//!
//! Raised at registry-build time and isolated per backend by the loader —
//! this type only describes *what* is wrong with one declaration file, not
//! which backends survive around it.

use spatch_types::TypeSpecError;
use std::fmt;

/// A backend declaration file failed to parse or validate.
#[derive(Clone, Debug)]
pub enum ConfigError {
    /// The file is not valid TOML.
    Syntax { locator: String, message: String },
    /// `name` is missing.
    MissingName { locator: String },
    /// `name` does not match the entry-point name it was declared under.
    NameMismatch {
        locator: String,
        declared: String,
        expected: String,
    },
    /// A `primary_types`/`secondary_types`/`higher_priority_than`-adjacent
    /// `TypeSpec` string is malformed.
    BadTypeSpec {
        locator: String,
        backend: String,
        source: TypeSpecError,
    },
    /// A `functions.<id>` table is missing a resolvable `function` locator.
    MissingImplementationRef {
        locator: String,
        backend: String,
        function_id: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Syntax { locator, message } => {
                write!(f, "{locator}: invalid declaration file: {message}")
            }
            ConfigError::MissingName { locator } => {
                write!(f, "{locator}: declaration is missing required field `name`")
            }
            ConfigError::NameMismatch {
                locator,
                declared,
                expected,
            } => write!(
                f,
                "{locator}: declared name {declared:?} does not match entry-point name {expected:?}"
            ),
            ConfigError::BadTypeSpec {
                locator,
                backend,
                source,
            } => write!(f, "{locator}: backend {backend:?}: {source}"),
            ConfigError::MissingImplementationRef {
                locator,
                backend,
                function_id,
            } => write!(
                f,
                "{locator}: backend {backend:?}: function {function_id:?} has no resolvable `function` locator"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
