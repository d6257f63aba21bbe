//! Link once, check many.
//!
//! [`Session`] owns a linked graph plus the validator options and answers
//! `check` queries against it. It is the embedding surface: everything
//! returns `anyhow::Result` with context naming the module or type involved.

use anyhow::{Context, Result};
use tracing::debug;
use tsv_common::Value;
use tsv_graph::TypeGraph;
use tsv_linker::{AsyncModuleLoader, Linker, MemoryLoader, ModuleLoader, PackageResolver};
use tsv_validator::{CheckResult, Validator, ValidatorOptions};

#[derive(Debug)]
pub struct Session {
    graph: TypeGraph,
    options: ValidatorOptions,
}

impl Session {
    pub fn new(graph: TypeGraph) -> Self {
        Self {
            graph,
            options: ValidatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse validator options from JSON (`{"acceptAdditionalProps": "false"}`).
    pub fn with_options_json(self, json: &str) -> Result<Self> {
        let options =
            ValidatorOptions::from_json_str(json).context("failed to parse validator options")?;
        Ok(self.with_options(options))
    }

    /// Link the modules reachable from `entry_paths`.
    pub fn link<L, S>(entry_paths: &[S], loader: &L) -> Result<Self>
    where
        L: ModuleLoader + ?Sized,
        S: AsRef<str>,
    {
        Self::link_with_packages(entry_paths, loader, &tsv_linker::NoPackages)
    }

    /// Like [`link`](Self::link), resolving bare specifiers through `packages`.
    pub fn link_with_packages<L, S>(
        entry_paths: &[S],
        loader: &L,
        packages: &dyn PackageResolver,
    ) -> Result<Self>
    where
        L: ModuleLoader + ?Sized,
        S: AsRef<str>,
    {
        let graph = Linker::with_package_resolver(packages)
            .link(entry_paths, loader)
            .with_context(|| format!("failed to link {}", entry_list(entry_paths)))?;
        Ok(Self::new(graph))
    }

    pub async fn link_async<L, S>(entry_paths: &[S], loader: &L) -> Result<Self>
    where
        L: AsyncModuleLoader + ?Sized,
        S: AsRef<str>,
    {
        let graph = tsv_linker::link_async(entry_paths, loader)
            .await
            .with_context(|| format!("failed to link {}", entry_list(entry_paths)))?;
        Ok(Self::new(graph))
    }

    /// Link from a JSON object mapping module paths to raw modules.
    pub fn from_json<S: AsRef<str>>(modules_json: &str, entry_paths: &[S]) -> Result<Self> {
        let loader = MemoryLoader::from_json_str(modules_json)?;
        Self::link(entry_paths, &loader)
    }

    pub const fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub const fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator::with_options(&self.graph, self.options.clone())
    }

    pub fn check(&self, module_path: &str, type_name: &str, value: &Value) -> Result<CheckResult> {
        self.validator()
            .check(module_path, type_name, value)
            .with_context(|| format!("cannot check against '{type_name}' of '{module_path}'"))
    }

    /// Check a JSON document. JSON objects become plain `Object` instances.
    pub fn check_json(
        &self,
        module_path: &str,
        type_name: &str,
        value_json: &str,
    ) -> Result<CheckResult> {
        let json: serde_json::Value =
            serde_json::from_str(value_json).context("failed to parse value JSON")?;
        let value = Value::from(json);
        let result = self.check(module_path, type_name, &value)?;
        debug!(module_path, type_name, conform = result.conform, "checked JSON value");
        Ok(result)
    }
}

fn entry_list<S: AsRef<str>>(entry_paths: &[S]) -> String {
    entry_paths
        .iter()
        .map(|path| format!("'{}'", path.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
