//! The abstracted installation-metadata interface (`spec.md` §1, §4.2).
//!
//! Scanning actual packaging metadata is explicitly out of scope for the
//! engine core; only this interface matters. A host library supplies an
//! implementation that knows how to enumerate entries under one named
//! group and read the declaration file each entry points at.

use std::fmt;

/// One enumerated backend: its declared name and an opaque locator for its
/// declaration file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryPointEntry {
    pub name: String,
    pub locator: String,
}

/// Source of entry-point declarations for one named group.
///
/// Implementations typically wrap a packaging index (e.g. Python's
/// `importlib.metadata` entry points, or a Cargo registry's plugin
/// manifest convention); the engine never depends on a specific one.
pub trait EntryPointSource: Send + Sync {
    /// The entry-point group this source enumerates (chosen by the host
    /// library at construction, e.g. `"mylib.backends"`).
    fn group(&self) -> &str;

    /// Enumerate all entries currently installed under `group()`.
    fn entries(&self) -> Result<Vec<EntryPointEntry>, SourceError>;

    /// Read the declaration file text a locator points at.
    fn read(&self, locator: &str) -> Result<String, SourceError>;
}

/// Failure enumerating or reading from an [`EntryPointSource`].
#[derive(Clone, Debug)]
pub struct SourceError(pub String);

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SourceError {}
