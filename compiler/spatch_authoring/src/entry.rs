//! The tuple a backend author registers per dispatchable function
//! (`spec.md` §4.8).

/// One backend implementation's local registration, pre-rewrite.
///
/// Rust has no decorator syntax; `AuthoringRegistry::register` plays the
/// role `spec.md` calls "a decorator-like marker" — author code calls it
/// once per implementation, typically from a module-level setup routine,
/// rather than annotating a function definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthoringEntry {
    /// The library's `"lib.mod:qualname"` function id this implements.
    pub library_function_id: String,
    /// `"m:n"` locator for this backend's implementation of it.
    pub local_implementation: String,
    /// Optional `"m:n"` locator for a `should_run` predicate.
    pub should_run: Option<String>,
    /// Whether `local_implementation` takes a `DispatchContext` first.
    pub uses_context: bool,
    /// Optional free-text documentation to carry into the declaration file.
    pub additional_docs: Option<String>,
}

impl AuthoringEntry {
    pub fn new(library_function_id: impl Into<String>, local_implementation: impl Into<String>) -> Self {
        AuthoringEntry {
            library_function_id: library_function_id.into(),
            local_implementation: local_implementation.into(),
            should_run: None,
            uses_context: false,
            additional_docs: None,
        }
    }

    #[must_use]
    pub fn with_should_run(mut self, locator: impl Into<String>) -> Self {
        self.should_run = Some(locator.into());
        self
    }

    #[must_use]
    pub fn with_uses_context(mut self, uses_context: bool) -> Self {
        self.uses_context = uses_context;
        self
    }

    #[must_use]
    pub fn with_additional_docs(mut self, docs: impl Into<String>) -> Self {
        self.additional_docs = Some(docs.into());
        self
    }
}
