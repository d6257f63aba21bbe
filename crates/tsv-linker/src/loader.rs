//! Raw module loaders.
//!
//! The linker never touches a filesystem: it asks a loader for the raw module
//! at a canonical path. Loaders must fail for paths they do not know and must
//! return the same module every time a path is requested; the linker itself
//! asks at most once per path.
//!
//! - [`ModuleLoader`]: synchronous, implemented for closures
//! - [`AsyncModuleLoader`]: returns a boxed future
//! - [`MemoryLoader`]: an in-memory map implementing both

use anyhow::{Context, Result, anyhow};
use dashmap::DashMap;
use futures::future::{self, BoxFuture};
use rustc_hash::FxHashMap;
use tsv_common::normalize_module_path;
use tsv_graph::RawModule;

pub trait ModuleLoader {
    /// Load the raw module at canonical `path`.
    fn load(&self, path: &str) -> Result<RawModule>;
}

impl<F> ModuleLoader for F
where
    F: Fn(&str) -> Result<RawModule>,
{
    fn load(&self, path: &str) -> Result<RawModule> {
        self(path)
    }
}

pub trait AsyncModuleLoader: Sync {
    /// Load the raw module at canonical `path`.
    fn load<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<RawModule>>;
}

// =============================================================================
// MemoryLoader
// =============================================================================

/// Raw modules held in memory, keyed by canonical path.
///
/// Records how often each path was loaded, which is how callers can observe
/// that linking fetches every module once.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    modules: FxHashMap<String, RawModule>,
    loads: DashMap<String, usize>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loader from a JSON object mapping module paths to raw modules.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let modules: FxHashMap<String, RawModule> =
            serde_json::from_str(json).context("failed to parse raw module map")?;
        let mut loader = Self::new();
        for (path, module) in modules {
            loader.insert(&path, module)?;
        }
        Ok(loader)
    }

    /// Add a module. `path` is normalized (`./a.ts` is stored as `./a`).
    pub fn insert(&mut self, path: &str, module: RawModule) -> Result<()> {
        let canonical = normalize_module_path(path, None)
            .with_context(|| format!("invalid module path '{path}'"))?;
        self.modules.insert(canonical, module);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert) for paths known to be relative.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a relative module path; use `insert` when the
    /// path comes from outside.
    pub fn with(mut self, path: &str, module: RawModule) -> Self {
        match normalize_module_path(path, None) {
            Ok(canonical) => {
                self.modules.insert(canonical, module);
            }
            Err(err) => panic!("MemoryLoader::with called with invalid module path: {err}"),
        }
        self
    }

    /// How many times `path` was loaded.
    pub fn load_count(&self, path: &str) -> usize {
        self.loads.get(path).map_or(0, |count| *count)
    }

    /// Total number of loads across all paths.
    pub fn total_loads(&self) -> usize {
        self.loads.iter().map(|entry| *entry.value()).sum()
    }

    fn fetch(&self, path: &str) -> Result<RawModule> {
        *self.loads.entry(path.to_string()).or_insert(0) += 1;
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("unknown module path '{path}'"))
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, path: &str) -> Result<RawModule> {
        self.fetch(path)
    }
}

impl AsyncModuleLoader for MemoryLoader {
    fn load<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<RawModule>> {
        Box::pin(future::ready(self.fetch(path)))
    }
}
