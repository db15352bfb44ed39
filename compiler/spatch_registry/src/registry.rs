//! `Registry`: the backend set plus its resolved priority order
//! (`spec.md` §4.3).

use crate::backend::{Backend, DEFAULT_BACKEND};
use crate::error::RegistryFrozen;
use crate::priority::{build_edges, resolve_order, CycleDiagnostic};
use rustc_hash::FxHashMap;
use spatch_decl::{BackendDecl, FunctionBinding, FunctionId};
use spatch_loader::{EntryPointSource, Loader};

/// One backend that failed to load; isolated rather than fatal
/// (`spec.md` §4.2).
#[derive(Clone, Debug)]
pub struct BrokenBackend {
    pub name: String,
    pub reason: String,
}

/// The backend set and its resolved base priority order. Built once;
/// read-only on the dispatch hot path thereafter (`spec.md` §4.3, §5).
pub struct Registry {
    backends: FxHashMap<String, Backend>,
    order: Vec<String>,
    cycle_diagnostics: Vec<CycleDiagnostic>,
    broken: Vec<BrokenBackend>,
    generation: u64,
    allow_post_init_registration: bool,
}

impl Registry {
    /// Discover backends via `loader`, apply `<prefix>_SET_ORDER`, and
    /// resolve the base priority order (`spec.md` §4.3 steps 1-2).
    ///
    /// `allow_post_init_registration` gates [`Registry::register`]; most
    /// integrations should pass `true` only if they genuinely support
    /// loading backends after startup.
    pub fn build<S: EntryPointSource>(
        loader: &Loader<S>,
        prefix: &str,
        allow_post_init_registration: bool,
    ) -> (Self, Vec<BrokenBackend>) {
        let mut backends = FxHashMap::default();
        backends.insert(DEFAULT_BACKEND.to_owned(), Backend::default_pseudo_backend());

        let mut broken = Vec::new();
        match loader.list() {
            Ok(entries) => {
                for entry in entries {
                    match loader.load(&entry) {
                        Ok(decl) => {
                            backends.insert(decl.name.clone(), Backend::from(decl));
                        }
                        Err(e) => {
                            tracing::warn!(backend = %entry.name, error = %e, "backend failed to load, isolating");
                            broken.push(BrokenBackend {
                                name: entry.name,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to enumerate entry points");
            }
        }

        let env_set_order = read_set_order_env(prefix);
        let edges = build_edges(&backends, &env_set_order);
        let names: Vec<String> = backends.keys().cloned().collect();
        let (order, cycle_diagnostics) = resolve_order(&names, edges);

        let registry = Registry {
            backends,
            order,
            cycle_diagnostics,
            broken: broken.clone(),
            generation: 0,
            allow_post_init_registration,
        };
        (registry, broken)
    }

    /// Register a backend after initial build, invalidating the
    /// dispatch cache's generation (`spec.md` §4.3, §4.5).
    pub fn register(&mut self, decl: BackendDecl) -> Result<(), RegistryFrozen> {
        if !self.allow_post_init_registration {
            return Err(RegistryFrozen);
        }
        self.backends.insert(decl.name.clone(), Backend::from(decl));
        let env_set_order = Vec::new();
        let names: Vec<String> = self.backends.keys().cloned().collect();
        let edges = build_edges(&self.backends, &env_set_order);
        let (order, diags) = resolve_order(&names, edges);
        self.order = order;
        self.cycle_diagnostics = diags;
        self.generation += 1;
        Ok(())
    }

    /// Attach the library's own binding for one dispatchable function to
    /// the `default` pseudo-backend. Called once per `make_dispatchable`
    /// registration, not from a declaration file.
    pub fn register_default_binding(&mut self, fn_id: FunctionId, binding: FunctionBinding) {
        if let Some(default) = self.backends.get_mut(DEFAULT_BACKEND) {
            default.functions.insert(fn_id, binding);
        }
        self.generation += 1;
    }

    /// Ordered `(backend, binding)` pairs naming `fn_id`, in base
    /// priority order (`spec.md` §4.3 step 3).
    pub fn lookup(&self, fn_id: &str) -> Vec<(&Backend, &FunctionBinding)> {
        self.order
            .iter()
            .filter_map(|name| {
                let backend = self.backends.get(name)?;
                let binding = backend.functions.get(fn_id)?;
                Some((backend, binding))
            })
            .collect()
    }

    pub fn backend(&self, name: &str) -> Option<&Backend> {
        self.backends.get(name)
    }

    /// Base priority order, highest first.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn cycle_diagnostics(&self) -> &[CycleDiagnostic] {
        &self.cycle_diagnostics
    }

    pub fn broken_backends(&self) -> &[BrokenBackend] {
        &self.broken
    }

    /// Bumps on any structural mutation; the dispatch cache invalidates
    /// bulk when this changes (`spec.md` §4.5).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn read_set_order_env(prefix: &str) -> Vec<(String, String)> {
    std::env::var(format!("{prefix}_SET_ORDER"))
        .ok()
        .map(|raw| {
            raw.split(',')
                .filter_map(|pair| {
                    let pair = pair.trim();
                    if pair.is_empty() {
                        return None;
                    }
                    let (a, b) = pair.split_once('>')?;
                    Some((a.trim().to_owned(), b.trim().to_owned()))
                })
                .collect()
        })
        .unwrap_or_default()
}
