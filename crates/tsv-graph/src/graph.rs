//! The linked type graph.
//!
//! `TypeGraph` is an arena: modules and named types are stored in flat
//! vectors and addressed by `ModuleId` / `NamedTypeId`. A named type is first
//! *declared* (name, flags, owning module, no body) and later *defined* (body
//! filled in). References inside bodies hold handles, never copies, so
//! cyclic type graphs need no shared ownership.
//!
//! Once the linker hands a graph out, it is read-only.

use crate::types::{GenericParamInfo, ModuleId, NamedTypeId, TypeData};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

// =============================================================================
// NamedType
// =============================================================================

#[derive(Clone, Debug)]
pub struct NamedType {
    pub id: NamedTypeId,
    pub name: String,
    pub exported: bool,
    pub generic_params: Vec<GenericParamInfo>,
    pub doc_comment: Option<String>,
    /// Owning module. Used for messages, never for traversal.
    pub module: ModuleId,
    body: Option<TypeData>,
}

impl NamedType {
    /// The body, or `None` while the type is only declared.
    pub const fn body(&self) -> Option<&TypeData> {
        self.body.as_ref()
    }

    pub const fn is_defined(&self) -> bool {
        self.body.is_some()
    }
}

// =============================================================================
// Module
// =============================================================================

/// A named import resolved to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportBinding {
    pub exported_name: String,
    pub local_name: String,
    pub target: NamedTypeId,
}

/// `import { ... } from "from_path"`, resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedImport {
    pub from_path: String,
    pub module: ModuleId,
    pub bindings: Vec<ImportBinding>,
}

/// `import * as local_namespace from "from_path"`, resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceImport {
    pub from_path: String,
    pub module: ModuleId,
    pub local_namespace: String,
}

#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    /// Canonical module path.
    pub path: String,
    named_types: IndexMap<String, NamedTypeId>,
    pub imports: Vec<LinkedImport>,
    pub namespaced_imports: Vec<NamespaceImport>,
}

impl Module {
    pub fn named_type(&self, name: &str) -> Option<NamedTypeId> {
        self.named_types.get(name).copied()
    }

    /// Named types in declaration order.
    pub fn named_types(&self) -> impl Iterator<Item = (&str, NamedTypeId)> {
        self.named_types.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.named_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named_types.is_empty()
    }
}

// =============================================================================
// TypeGraph
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    modules: Vec<Module>,
    types: Vec<NamedType>,
    by_path: FxHashMap<String, ModuleId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Add an empty module for `path`, or return the existing one.
    pub fn add_module(&mut self, path: &str) -> ModuleId {
        if let Some(&id) = self.by_path.get(path) {
            return id;
        }
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(Module {
            id,
            path: path.to_string(),
            named_types: IndexMap::new(),
            imports: Vec::new(),
            namespaced_imports: Vec::new(),
        });
        self.by_path.insert(path.to_string(), id);
        id
    }

    /// Declare a named type in `module` with an empty body.
    ///
    /// Returns `None` if `module` already declares `name`.
    pub fn declare_type(
        &mut self,
        module: ModuleId,
        name: &str,
        exported: bool,
        doc_comment: Option<String>,
    ) -> Option<NamedTypeId> {
        let id = NamedTypeId(self.types.len() as u32);
        let entry = &mut self.modules[module.0 as usize].named_types;
        if entry.contains_key(name) {
            return None;
        }
        entry.insert(name.to_string(), id);
        self.types.push(NamedType {
            id,
            name: name.to_string(),
            exported,
            generic_params: Vec::new(),
            doc_comment,
            module,
            body: None,
        });
        Some(id)
    }

    /// Fill in a declared type's body and generic parameters.
    pub fn define_type(
        &mut self,
        id: NamedTypeId,
        generic_params: Vec<GenericParamInfo>,
        body: TypeData,
    ) {
        let named = &mut self.types[id.0 as usize];
        named.generic_params = generic_params;
        named.body = Some(body);
    }

    pub fn set_imports(
        &mut self,
        module: ModuleId,
        imports: Vec<LinkedImport>,
        namespaced_imports: Vec<NamespaceImport>,
    ) {
        let module = &mut self.modules[module.0 as usize];
        module.imports = imports;
        module.namespaced_imports = namespaced_imports;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0 as usize]
    }

    pub fn module_id(&self, path: &str) -> Option<ModuleId> {
        self.by_path.get(path).copied()
    }

    pub fn module_by_path(&self, path: &str) -> Option<&Module> {
        self.module_id(path).map(|id| self.module(id))
    }

    /// Modules in declaration (discovery) order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn named_type(&self, id: NamedTypeId) -> &NamedType {
        &self.types[id.0 as usize]
    }

    pub fn named_type_count(&self) -> usize {
        self.types.len()
    }

    /// Look up a named type by module path and name.
    pub fn lookup(&self, path: &str, name: &str) -> Option<&NamedType> {
        let id = self.module_by_path(path)?.named_type(name)?;
        Some(self.named_type(id))
    }

    /// `path#Name`, for messages.
    pub fn qualified_name(&self, id: NamedTypeId) -> String {
        let named = self.named_type(id);
        format!("{}#{}", self.module(named.module).path, named.name)
    }

    /// Whether every declared type has a body.
    pub fn is_fully_defined(&self) -> bool {
        self.types.iter().all(NamedType::is_defined)
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod tests;
