//! Offline rewriting of a declaration file's `functions` section
//! (`spec.md` §4.8).
//!
//! Format-preserving: every other table (`name`, `primary_types`,
//! `higher_priority_than`, hand-written comments...) passes through
//! untouched. Only `[functions.*]` entries present in the
//! [`crate::registry::AuthoringRegistry`] are replaced wholesale; entries
//! for function ids the registry doesn't mention are left as they are,
//! since a backend may hand-maintain bindings the authoring registry
//! doesn't cover.

use crate::error::RewriteError;
use crate::registry::AuthoringRegistry;
use spatch_decl::BackendDecl;
use toml_edit::{value, DocumentMut, Item, Table};

/// Rewrite `existing_text`'s `functions` tables to match `registry`,
/// returning the updated file text. `locator` identifies the file for
/// error messages only.
///
/// If the rewritten text declares a `name`, the result is parsed back
/// through [`spatch_decl::BackendDecl::parse`] before being returned, so a
/// backend author learns about a malformed locator or missing field at
/// rewrite time rather than at the engine's next registry build.
pub fn rewrite_functions(
    locator: &str,
    existing_text: &str,
    registry: &AuthoringRegistry,
) -> Result<String, RewriteError> {
    let mut doc: DocumentMut = existing_text.parse().map_err(|e: toml_edit::TomlError| RewriteError {
        locator: locator.to_owned(),
        message: e.to_string(),
    })?;

    let functions = doc
        .entry("functions")
        .or_insert_with(|| Item::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| RewriteError {
            locator: locator.to_owned(),
            message: "`functions` is not a table".to_owned(),
        })?;
    functions.set_implicit(true);

    for entry in registry.entries() {
        let mut fn_table = Table::new();
        fn_table["function"] = value(entry.local_implementation.as_str());
        if let Some(should_run) = &entry.should_run {
            fn_table["should_run"] = value(should_run.as_str());
        }
        if entry.uses_context {
            fn_table["uses_context"] = value(true);
        }
        if let Some(docs) = &entry.additional_docs {
            fn_table["additional_docs"] = value(docs.as_str());
        }
        functions.insert(&entry.library_function_id, Item::Table(fn_table));
    }

    let rewritten = doc.to_string();

    if let Some(name) = doc.get("name").and_then(Item::as_str) {
        BackendDecl::parse(locator, &rewritten, name).map_err(|e| RewriteError {
            locator: locator.to_owned(),
            message: e.to_string(),
        })?;
    }

    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuthoringEntry;

    #[test]
    fn preserves_unrelated_top_level_fields() {
        let existing = "name = \"mybackend\"\nprimary_types = [\"builtins:int\"]\n";
        let mut registry = AuthoringRegistry::new();
        registry.register(AuthoringEntry::new("lib:divide", "mybackend:divide"));
        let rewritten = rewrite_functions("test.toml", existing, &registry).unwrap();
        assert!(rewritten.contains("name = \"mybackend\""));
        assert!(rewritten.contains("primary_types"));
        assert!(rewritten.contains("divide"));
    }

    #[test]
    fn replaces_a_stale_binding_for_the_same_function_id() {
        let existing = "name = \"mybackend\"\n[functions.\"lib:divide\"]\nfunction = \"mybackend:old_divide\"\n";
        let mut registry = AuthoringRegistry::new();
        registry.register(AuthoringEntry::new("lib:divide", "mybackend:new_divide"));
        let rewritten = rewrite_functions("test.toml", existing, &registry).unwrap();
        assert!(rewritten.contains("new_divide"));
        assert!(!rewritten.contains("old_divide"));
    }

    #[test]
    fn leaves_untouched_function_entries_the_registry_does_not_mention() {
        let existing =
            "name = \"mybackend\"\n[functions.\"lib:other\"]\nfunction = \"mybackend:other\"\n";
        let registry = AuthoringRegistry::new();
        let rewritten = rewrite_functions("test.toml", existing, &registry).unwrap();
        assert!(rewritten.contains("mybackend:other"));
    }

    #[test]
    fn rewrites_an_empty_declaration_skeleton() {
        let registry_empty = AuthoringRegistry::new();
        let rewritten = rewrite_functions("test.toml", "", &registry_empty).unwrap();
        assert!(rewritten.trim().is_empty() || rewritten.contains("functions"));
    }

    #[test]
    fn invalid_toml_surfaces_a_rewrite_error() {
        let mut registry = AuthoringRegistry::new();
        registry.register(AuthoringEntry::new("lib:divide", "mybackend:divide"));
        let err = rewrite_functions("test.toml", "not = [valid", &registry).unwrap_err();
        assert_eq!(err.locator, "test.toml");
    }
}
