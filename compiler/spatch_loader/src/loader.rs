//! Enumerate and lazily parse backend declarations (`spec.md` §4.2).

use crate::source::{EntryPointEntry, EntryPointSource, SourceError};
use rustc_hash::FxHashSet;
use spatch_decl::{BackendDecl, ConfigError};
use std::fmt;

/// Either half of what can go wrong loading one backend's declaration.
#[derive(Clone, Debug)]
pub enum LoadError {
    Read(SourceError),
    Config(ConfigError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Read(e) => write!(f, "{e}"),
            LoadError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<SourceError> for LoadError {
    fn from(e: SourceError) -> Self {
        LoadError::Read(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Config(e)
    }
}

/// Enumerates entry-point declarations for one group and parses them on
/// first need, honoring a block-list read from `<PREFIX>_BLOCK`.
pub struct Loader<S> {
    source: S,
    blocked: FxHashSet<String>,
}

impl<S: EntryPointSource> Loader<S> {
    /// Build a loader with an explicit block-list (mainly for tests; see
    /// [`Loader::from_env`] for the normal, env-var-driven construction).
    pub fn new(source: S, blocked: impl IntoIterator<Item = String>) -> Self {
        Loader {
            source,
            blocked: blocked.into_iter().collect(),
        }
    }

    /// Build a loader reading its block-list from `<prefix>_BLOCK`
    /// (comma-separated backend names, `spec.md` §6).
    pub fn from_env(source: S, prefix: &str) -> Self {
        let blocked = std::env::var(format!("{prefix}_BLOCK"))
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Self::new(source, blocked)
    }

    /// Whether `name` is suppressed by the block-list.
    pub fn is_blocked(&self, name: &str) -> bool {
        self.blocked.contains(name)
    }

    /// Enumerate entries, rejecting later duplicates by name
    /// (`spec.md` §4.2 `list`). Blocked entries are dropped here so
    /// callers never see, let alone read, their declaration files.
    pub fn list(&self) -> Result<Vec<EntryPointEntry>, SourceError> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for entry in self.source.entries()? {
            if self.is_blocked(&entry.name) {
                tracing::debug!(backend = %entry.name, "backend suppressed by block-list");
                continue;
            }
            if !seen.insert(entry.name.clone()) {
                tracing::warn!(
                    backend = %entry.name,
                    "duplicate entry-point name, rejecting the later declaration"
                );
                continue;
            }
            out.push(entry);
        }
        Ok(out)
    }

    /// Parse and validate one entry's declaration file.
    ///
    /// Deferred until first need per `spec.md`'s lifecycle: `list()` only
    /// touches metadata, never file contents.
    pub fn load(&self, entry: &EntryPointEntry) -> Result<BackendDecl, LoadError> {
        let text = self.source.read(&entry.locator)?;
        let decl = BackendDecl::parse(&entry.locator, &text, &entry.name)?;
        Ok(decl)
    }
}
