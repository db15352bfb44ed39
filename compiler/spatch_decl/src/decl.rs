//! Validated backend declaration data (`spec.md` §3 `Backend`, `FunctionBinding`).

use crate::error::ConfigError;
use crate::raw::{RawDecl, RawFunctionEntry, DEFAULTS_KEY};
use rustc_hash::FxHashMap;
use spatch_types::TypeSpec;

/// The library-qualified name of a dispatchable function: `"lib.mod:qualname"`.
pub type FunctionId = String;

/// One dispatchable function's implementation in one backend
/// (`spec.md` §3 `FunctionBinding`).
#[derive(Clone, Debug)]
pub struct FunctionBinding {
    /// `"m:n"` locator, resolved lazily on first use.
    pub implementation_ref: String,
    /// Optional `"m:n"` locator for the `should_run` predicate.
    pub should_run: Option<String>,
    /// Whether the implementation's first argument is a `DispatchContext`.
    pub uses_context: bool,
    /// Optional extra documentation surfaced to introspection tooling.
    pub additional_docs: Option<String>,
}

/// A fully parsed and validated backend declaration (`spec.md` §3 `Backend`,
/// minus `module_source`, which the loader attaches once it knows where the
/// file came from).
#[derive(Clone, Debug)]
pub struct BackendDecl {
    pub name: String,
    pub primary_types: Vec<TypeSpec>,
    pub secondary_types: Vec<TypeSpec>,
    pub requires_opt_in: bool,
    pub higher_priority_than: Vec<String>,
    pub lower_priority_than: Vec<String>,
    pub functions: FxHashMap<FunctionId, FunctionBinding>,
}

impl BackendDecl {
    /// Parse and validate one declaration file's text.
    ///
    /// `locator` identifies the file for error messages; `entry_name` is
    /// the name this backend was enumerated under (`spec.md` §4.2 `load`),
    /// which the declared `name` field must match.
    pub fn parse(locator: &str, text: &str, entry_name: &str) -> Result<Self, ConfigError> {
        let raw: RawDecl = toml::from_str(text).map_err(|e| ConfigError::Syntax {
            locator: locator.to_owned(),
            message: e.to_string(),
        })?;

        let name = raw.name.ok_or_else(|| ConfigError::MissingName {
            locator: locator.to_owned(),
        })?;
        if name != entry_name {
            return Err(ConfigError::NameMismatch {
                locator: locator.to_owned(),
                declared: name,
                expected: entry_name.to_owned(),
            });
        }

        let primary_types = parse_specs(locator, &name, &raw.primary_types)?;
        let secondary_types = parse_specs(locator, &name, &raw.secondary_types)?;

        let requires_opt_in = raw.requires_opt_in.unwrap_or(!primary_types.is_empty());

        let defaults = raw
            .functions
            .get(DEFAULTS_KEY)
            .cloned()
            .unwrap_or_default();

        let mut functions = FxHashMap::default();
        for (fn_id, entry) in raw.functions {
            if fn_id == DEFAULTS_KEY {
                continue;
            }
            let entry = entry.with_defaults(&defaults);
            let implementation_ref =
                entry
                    .function
                    .filter(|r| is_locator_shape(r))
                    .ok_or_else(|| ConfigError::MissingImplementationRef {
                        locator: locator.to_owned(),
                        backend: name.clone(),
                        function_id: fn_id.clone(),
                    })?;

            functions.insert(
                fn_id,
                FunctionBinding {
                    implementation_ref,
                    should_run: entry.should_run,
                    uses_context: entry.uses_context.unwrap_or(false),
                    additional_docs: entry.additional_docs,
                },
            );
        }

        Ok(BackendDecl {
            name,
            primary_types,
            secondary_types,
            requires_opt_in,
            higher_priority_than: raw.higher_priority_than,
            lower_priority_than: raw.lower_priority_than,
            functions,
        })
    }
}

/// Validate that a `"m:n"` locator has the expected shape. Symbol
/// resolution itself is deferred to first use (`spec.md` §4.2).
fn is_locator_shape(s: &str) -> bool {
    matches!(s.split_once(':'), Some((m, n)) if !m.is_empty() && !n.is_empty())
}

fn parse_specs(locator: &str, backend: &str, raw: &[String]) -> Result<Vec<TypeSpec>, ConfigError> {
    raw.iter()
        .map(|s| {
            TypeSpec::parse(s).map_err(|source| ConfigError::BadTypeSpec {
                locator: locator.to_owned(),
                backend: backend.to_owned(),
                source,
            })
        })
        .collect()
}
