//! Type graphs for the tsv structural validator.
//!
//! Two forms of the same graph live here:
//!
//! - **Raw** (`raw`): what an external parser produces, one `RawModule` per
//!   module path, with references between types spelled as plain names.
//!   Every raw shape is serde-serializable.
//! - **Linked** (`types`, `graph`): the identity-based form built by the
//!   linker. Named types live in an arena (`TypeGraph`) and references carry
//!   `NamedTypeId` handles, so self- and mutually-referential types are
//!   representable without ownership cycles.
//!
//! `display` renders linked types for diagnostics.

pub mod display;
pub mod graph;
pub mod raw;
pub mod types;

pub use display::TypeFormatter;
pub use graph::{ImportBinding, LinkedImport, Module, NamedType, NamespaceImport, TypeGraph};
pub use raw::{
    RawFunction, RawGenericParam, RawImport, RawImportMember, RawInterface, RawInterfaceEntry,
    RawModule, RawNamedType, RawNamespacedImport, RawParam, RawType,
};
pub use types::{
    CompositeOp, FunctionShape, GenericParamInfo, IndexKeyKind, IndexSignature, InterfaceShape,
    Intrinsic, LiteralValue, MappedIndexSignature, MemberKey, ModuleId, NameCategory, NamedTypeId,
    ParamInfo, PrimitiveName, PropertySignature, SpecialName, TypeData,
};
