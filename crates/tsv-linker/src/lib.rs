//! Module linker for the tsv structural validator.
//!
//! Loads raw modules through a [`ModuleLoader`] (or [`AsyncModuleLoader`]),
//! resolves imports between them and produces a fully linked
//! [`TypeGraph`](tsv_graph::TypeGraph). Import cycles, including a module
//! importing itself, are supported; every module is loaded once.
//!
//! ```ignore
//! let loader = MemoryLoader::new().with("./a", module_a).with("./b", module_b);
//! let graph = tsv_linker::link(["./a"], &loader)?;
//! ```

mod error;
mod linker;
mod loader;
mod lower;
mod prefetch;
mod resolver;

pub use error::{InterfaceShapeError, LinkError};
pub use linker::{Linker, link, link_async};
pub use loader::{AsyncModuleLoader, MemoryLoader, ModuleLoader};
pub use resolver::{NoPackages, PackageMap, PackageResolver};
