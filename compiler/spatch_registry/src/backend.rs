//! `Backend`: the registry's in-memory backend descriptor (`spec.md` §3).

use rustc_hash::FxHashMap;
use spatch_decl::{BackendDecl, FunctionBinding, FunctionId};
use spatch_types::TypeSpec;

/// The reserved name of the library's own implementations.
pub const DEFAULT_BACKEND: &str = "default";

/// One registered backend: either a parsed declaration, or the
/// distinguished `default` pseudo-backend (`spec.md` §3).
#[derive(Clone, Debug)]
pub struct Backend {
    pub name: String,
    pub primary_types: Vec<TypeSpec>,
    pub secondary_types: Vec<TypeSpec>,
    pub requires_opt_in: bool,
    pub higher_priority_than: Vec<String>,
    pub lower_priority_than: Vec<String>,
    pub functions: FxHashMap<FunctionId, FunctionBinding>,
}

impl Backend {
    /// The `default` pseudo-backend: no declared types, never opt-in,
    /// lowest base priority (`spec.md` §3). Its `functions` map is filled
    /// in by `Registry::register_default_binding` as the library
    /// registers dispatchables, not by a declaration file.
    pub fn default_pseudo_backend() -> Self {
        Backend {
            name: DEFAULT_BACKEND.to_owned(),
            primary_types: Vec::new(),
            secondary_types: Vec::new(),
            requires_opt_in: false,
            higher_priority_than: Vec::new(),
            lower_priority_than: Vec::new(),
            functions: FxHashMap::default(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_BACKEND
    }

    /// All declared type specs, primary then secondary, the set consulted
    /// when matching a call's type multiset (`spec.md` §4.6 step 3b).
    pub fn all_type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.primary_types.iter().chain(self.secondary_types.iter())
    }
}

impl From<BackendDecl> for Backend {
    fn from(decl: BackendDecl) -> Self {
        Backend {
            name: decl.name,
            primary_types: decl.primary_types,
            secondary_types: decl.secondary_types,
            requires_opt_in: decl.requires_opt_in,
            higher_priority_than: decl.higher_priority_than,
            lower_priority_than: decl.lower_priority_than,
            functions: decl.functions,
        }
    }
}
