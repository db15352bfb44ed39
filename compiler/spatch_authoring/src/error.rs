//! Offline-rewrite errors.

use std::fmt;

/// The declaration file being rewritten is not valid TOML.
#[derive(Debug)]
pub struct RewriteError {
    pub locator: String,
    pub message: String,
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: cannot rewrite declaration file: {}", self.locator, self.message)
    }
}

impl std::error::Error for RewriteError {}
