//! TOML deserialization shapes for declaration files (`spec.md` §6).
//!
//! Kept separate from [`crate::BackendDecl`] because the raw shape allows
//! fields that are invalid on their own (an empty `name`, a malformed
//! `TypeSpec` string) — validation happens once, explicitly, in
//! `BackendDecl::parse`, rather than being smeared across `Deserialize`
//! impls.

use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub(crate) struct RawDecl {
    pub name: Option<String>,
    #[serde(default)]
    pub primary_types: Vec<String>,
    #[serde(default)]
    pub secondary_types: Vec<String>,
    pub requires_opt_in: Option<bool>,
    #[serde(default)]
    pub higher_priority_than: Vec<String>,
    #[serde(default)]
    pub lower_priority_than: Vec<String>,
    #[serde(default)]
    pub functions: FxHashMap<String, RawFunctionEntry>,
}

/// One `[functions.<lib_fn_id>]` table, or the special `[functions.defaults]`
/// table whose fields backfill any entry that omits them.
#[derive(Deserialize, Debug, Default, Clone)]
pub(crate) struct RawFunctionEntry {
    pub function: Option<String>,
    pub should_run: Option<String>,
    pub uses_context: Option<bool>,
    pub additional_docs: Option<String>,
}

impl RawFunctionEntry {
    /// Backfill any field this entry omits from `defaults`.
    pub(crate) fn with_defaults(mut self, defaults: &RawFunctionEntry) -> Self {
        self.function = self.function.or_else(|| defaults.function.clone());
        self.should_run = self.should_run.or_else(|| defaults.should_run.clone());
        self.uses_context = self.uses_context.or(defaults.uses_context);
        self.additional_docs = self
            .additional_docs
            .or_else(|| defaults.additional_docs.clone());
        self
    }
}

pub(crate) const DEFAULTS_KEY: &str = "defaults";
