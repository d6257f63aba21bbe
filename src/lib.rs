//! tsv: structural type descriptions for runtime values.
//!
//! | Crate | Role |
//! |-------|------|
//! | [`tsv_common`] | runtime value model, module path normalization |
//! | [`tsv_graph`] | raw (name-based) and linked (handle-based) type graphs |
//! | [`tsv_linker`] | loads raw modules and links them into a `TypeGraph` |
//! | [`tsv_validator`] | checks values against linked types, renders diagnostics |
//!
//! This crate re-exports the pieces an embedder needs and adds [`Session`],
//! which links once and answers many `check` queries.
//!
//! ```ignore
//! let session = tsv::Session::from_json(modules_json, &["./models"])?;
//! let result = session.check_json("./models", "User", r#"{"id": 1}"#)?;
//! ```

pub mod session;
pub mod tracing_config;

pub use session::Session;

pub use tsv_common::{FunctionValue, ObjectValue, TypeofTag, Value, normalize_module_path};
pub use tsv_graph::{
    ModuleId, NamedTypeId, RawInterface, RawModule, RawNamedType, RawType, TypeGraph,
};
pub use tsv_linker::{
    AsyncModuleLoader, LinkError, Linker, MemoryLoader, ModuleLoader, PackageMap,
    PackageResolver, link, link_async,
};
pub use tsv_validator::{CheckError, CheckResult, Validator, ValidatorOptions};

pub use tsv_common;
pub use tsv_graph;
pub use tsv_linker;
pub use tsv_validator;
