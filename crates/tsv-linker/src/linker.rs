//! Module linker.
//!
//! Turns raw, name-based modules into a linked `TypeGraph` in two phases:
//!
//! 1. **Declare** – modules are discovered recursively from the entry paths,
//!    each loaded once. Loading a module immediately declares all of its
//!    named types (stable handles, empty bodies) before its imports are
//!    visited. A module that imports one of its ancestors therefore sees the
//!    ancestor's declarations even though no body exists yet, which is what
//!    makes import cycles safe.
//! 2. **Define** – once every reachable module is declared, each module's
//!    imports are resolved and every body is lowered, swapping reference
//!    names for handles.
//!
//! No body is defined before the declare phase has finished for the whole
//! reachable set; lowering looks declarations up and they must exist.

use crate::error::LinkError;
use crate::loader::{AsyncModuleLoader, ModuleLoader};
use crate::lower::{ImportScope, Lowerer, exported_member};
use crate::prefetch::prefetch_modules;
use crate::resolver::{NoPackages, PackageResolver, canonicalize};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use tsv_graph::{ImportBinding, LinkedImport, ModuleId, NamespaceImport, RawModule, TypeGraph};

/// Link the modules reachable from `entry_paths` with a synchronous loader.
///
/// External package specifiers are rejected; use [`Linker`] to supply a
/// [`PackageResolver`].
pub fn link<L, I, S>(entry_paths: I, loader: &L) -> Result<TypeGraph, LinkError>
where
    L: ModuleLoader + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Linker::new().link(entry_paths, loader)
}

/// Link the modules reachable from `entry_paths`, loading them concurrently.
pub async fn link_async<L, I, S>(entry_paths: I, loader: &L) -> Result<TypeGraph, LinkError>
where
    L: AsyncModuleLoader + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Linker::new().link_async(entry_paths, loader).await
}

// =============================================================================
// Linker
// =============================================================================

pub struct Linker<'r> {
    packages: &'r dyn PackageResolver,
}

impl Linker<'static> {
    /// A linker that resolves no external packages.
    pub fn new() -> Self {
        Self {
            packages: &NoPackages,
        }
    }
}

impl Default for Linker<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Linker<'r> {
    pub fn with_package_resolver(packages: &'r dyn PackageResolver) -> Self {
        Self { packages }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn link<L, I, S>(&self, entry_paths: I, loader: &L) -> Result<TypeGraph, LinkError>
    where
        L: ModuleLoader + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.canonical_entries(entry_paths)?;
        let mut session = LinkSession::new(self.packages);
        let mut fetch = |path: &str| {
            loader.load(path).map_err(|source| LinkError::Load {
                path: path.to_string(),
                source,
            })
        };
        for entry in entries {
            session.visit(entry, &mut fetch)?;
        }
        session.finish()
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn link_async<L, I, S>(
        &self,
        entry_paths: I,
        loader: &L,
    ) -> Result<TypeGraph, LinkError>
    where
        L: AsyncModuleLoader + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.canonical_entries(entry_paths)?;
        let mut prefetched = prefetch_modules(self.packages, &entries, loader).await?;

        // Every module is in memory now; declare and define in the same
        // deterministic order the synchronous path would use.
        let mut session = LinkSession::new(self.packages);
        let mut fetch = |path: &str| {
            prefetched.remove(path).ok_or_else(|| LinkError::Load {
                path: path.to_string(),
                source: anyhow::anyhow!("module was not prefetched"),
            })
        };
        for entry in entries {
            session.visit(entry, &mut fetch)?;
        }
        session.finish()
    }

    fn canonical_entries<I, S>(&self, entry_paths: I) -> Result<Vec<String>, LinkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entry_paths
            .into_iter()
            .map(|path| canonicalize(self.packages, path.as_ref(), None))
            .collect()
    }
}

// =============================================================================
// LinkSession
// =============================================================================

/// A declared module waiting for its define phase.
struct PendingModule {
    raw: RawModule,
    /// Target module of each `raw.imports` entry.
    import_modules: Vec<ModuleId>,
    /// Target module of each `raw.namespaced_imports` entry.
    namespace_modules: Vec<ModuleId>,
}

struct LinkSession<'r> {
    packages: &'r dyn PackageResolver,
    graph: TypeGraph,
    /// Indexed by `ModuleId`.
    pending: Vec<PendingModule>,
}

impl<'r> LinkSession<'r> {
    fn new(packages: &'r dyn PackageResolver) -> Self {
        Self {
            packages,
            graph: TypeGraph::new(),
            pending: Vec::new(),
        }
    }

    /// Load and declare the module at canonical `path` and, recursively,
    /// everything it imports. Memoized by path.
    fn visit(
        &mut self,
        path: String,
        fetch: &mut dyn FnMut(&str) -> Result<RawModule, LinkError>,
    ) -> Result<ModuleId, LinkError> {
        if let Some(id) = self.graph.module_id(&path) {
            trace!(path = %path, "module already declared");
            return Ok(id);
        }

        let raw = fetch(&path)?;
        let id = self.declare(&path, &raw)?;

        let import_paths = raw
            .imports
            .iter()
            .map(|import| canonicalize(self.packages, &import.from_path, Some(&path)))
            .collect::<Result<Vec<_>, _>>()?;
        let namespace_paths = raw
            .namespaced_imports
            .iter()
            .map(|import| canonicalize(self.packages, &import.from_path, Some(&path)))
            .collect::<Result<Vec<_>, _>>()?;

        self.pending.push(PendingModule {
            raw,
            import_modules: Vec::new(),
            namespace_modules: Vec::new(),
        });

        let mut import_modules = Vec::with_capacity(import_paths.len());
        for import_path in import_paths {
            import_modules.push(self.visit(import_path, fetch)?);
        }
        let mut namespace_modules = Vec::with_capacity(namespace_paths.len());
        for namespace_path in namespace_paths {
            namespace_modules.push(self.visit(namespace_path, fetch)?);
        }

        let pending = &mut self.pending[id.0 as usize];
        pending.import_modules = import_modules;
        pending.namespace_modules = namespace_modules;
        Ok(id)
    }

    /// Declare phase for one module: placeholders for every named type.
    fn declare(&mut self, path: &str, raw: &RawModule) -> Result<ModuleId, LinkError> {
        let module = self.graph.add_module(path);
        debug_assert_eq!(module.0 as usize, self.pending.len());
        for named in &raw.named_types {
            self.graph
                .declare_type(module, &named.name, named.exported, named.doc_comment.clone())
                .ok_or_else(|| LinkError::DuplicateName {
                    module: path.to_string(),
                    name: named.name.clone(),
                })?;
        }
        debug!(
            path = %path,
            types = raw.named_types.len(),
            imports = raw.imports.len() + raw.namespaced_imports.len(),
            "declared module"
        );
        Ok(module)
    }

    /// Define phase for every declared module.
    fn finish(mut self) -> Result<TypeGraph, LinkError> {
        let pending = std::mem::take(&mut self.pending);
        for (index, module) in pending.iter().enumerate() {
            self.define(ModuleId(index as u32), module)?;
        }
        debug_assert!(self.graph.is_fully_defined());
        debug!(
            modules = self.graph.module_count(),
            types = self.graph.named_type_count(),
            "linked type graph"
        );
        Ok(self.graph)
    }

    fn define(&mut self, module: ModuleId, pending: &PendingModule) -> Result<(), LinkError> {
        let path = self.graph.module(module).path.clone();
        let (scope, imports, namespaced_imports) = self.resolve_imports(&path, module, pending)?;

        let mut bodies = Vec::with_capacity(pending.raw.named_types.len());
        for named in &pending.raw.named_types {
            let Some(id) = self.graph.module(module).named_type(&named.name) else {
                continue;
            };
            let lowerer = Lowerer::new(&self.graph, module, &scope, &named.name);
            let generics = lowerer.lower_generics(&named.generic_params)?;
            let body = lowerer.lower(&named.body)?;
            bodies.push((id, generics, body));
        }

        for (id, generics, body) in bodies {
            self.graph.define_type(id, generics, body);
        }
        self.graph.set_imports(module, imports, namespaced_imports);
        debug!(path = %path, "defined module");
        Ok(())
    }

    fn resolve_imports(
        &self,
        path: &str,
        module: ModuleId,
        pending: &PendingModule,
    ) -> Result<(ImportScope, Vec<LinkedImport>, Vec<NamespaceImport>), LinkError> {
        let mut scope = ImportScope::default();
        // Local declarations, import aliases and namespaces share one scope.
        let mut bound: FxHashSet<String> = self
            .graph
            .module(module)
            .named_types()
            .map(|(name, _)| name.to_string())
            .collect();
        let mut bind = |name: &str| -> Result<(), LinkError> {
            if !bound.insert(name.to_string()) {
                return Err(LinkError::DuplicateName {
                    module: path.to_string(),
                    name: name.to_string(),
                });
            }
            Ok(())
        };

        let mut imports = Vec::with_capacity(pending.raw.imports.len());
        for (import, &target) in pending.raw.imports.iter().zip(&pending.import_modules) {
            let mut bindings = Vec::with_capacity(import.members.len());
            for member in &import.members {
                let id = exported_member(&self.graph, target, &member.exported_name)
                    .ok_or_else(|| LinkError::UnknownExportedMember {
                        module: path.to_string(),
                        from: self.graph.module(target).path.clone(),
                        member: member.exported_name.clone(),
                    })?;
                bind(member.local_name())?;
                scope.aliases.insert(member.local_name().to_string(), id);
                bindings.push(ImportBinding {
                    exported_name: member.exported_name.clone(),
                    local_name: member.local_name().to_string(),
                    target: id,
                });
            }
            imports.push(LinkedImport {
                from_path: self.graph.module(target).path.clone(),
                module: target,
                bindings,
            });
        }

        let mut namespaced_imports = Vec::with_capacity(pending.raw.namespaced_imports.len());
        for (import, &target) in pending
            .raw
            .namespaced_imports
            .iter()
            .zip(&pending.namespace_modules)
        {
            bind(&import.local_namespace)?;
            scope
                .namespaces
                .insert(import.local_namespace.clone(), target);
            namespaced_imports.push(NamespaceImport {
                from_path: self.graph.module(target).path.clone(),
                module: target,
                local_namespace: import.local_namespace.clone(),
            });
        }

        Ok((scope, imports, namespaced_imports))
    }
}

#[cfg(test)]
#[path = "../tests/linker_tests.rs"]
mod tests;
