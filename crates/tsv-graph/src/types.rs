//! Linked type representation.
//!
//! `TypeData` is the closed set of type kinds. Both the linker's lowering and
//! the validator match on it exhaustively, so a new kind cannot be added
//! without handling it in both places.
//!
//! The leaf enums (`NameCategory`, `CompositeOp`, `LiteralValue`, `MemberKey`,
//! the signature structs) are shared with the raw form; the signature structs
//! are generic over the type they carry (`RawType` before linking,
//! `TypeData` after).

use serde::{Deserialize, Serialize};

// =============================================================================
// Handles
// =============================================================================

/// Handle of a module in a `TypeGraph`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

/// Handle of a named type in a `TypeGraph`.
///
/// Handles are stable from the moment a type is declared, before its body
/// exists, which is what lets cyclic references be wired immediately.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedTypeId(pub u32);

// =============================================================================
// Intrinsic names
// =============================================================================

/// Category of a `nameRef`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameCategory {
    /// `any`, `unknown`, `object`, `void`, `never`
    Special,
    /// `string`, `number`, `bigint`, `boolean`, `undefined`, `null`, `symbol`
    Primitive,
    /// An ambient constructor checked through the prototype chain (`Date`, `Map`, ...)
    Global,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecialName {
    Any,
    Unknown,
    Object,
    Void,
    Never,
}

impl SpecialName {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "any" => SpecialName::Any,
            "unknown" => SpecialName::Unknown,
            "object" => SpecialName::Object,
            "void" => SpecialName::Void,
            "never" => SpecialName::Never,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SpecialName::Any => "any",
            SpecialName::Unknown => "unknown",
            SpecialName::Object => "object",
            SpecialName::Void => "void",
            SpecialName::Never => "never",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveName {
    String,
    Number,
    BigInt,
    Boolean,
    Undefined,
    Null,
    Symbol,
}

impl PrimitiveName {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" => PrimitiveName::String,
            "number" => PrimitiveName::Number,
            "bigint" => PrimitiveName::BigInt,
            "boolean" => PrimitiveName::Boolean,
            "undefined" => PrimitiveName::Undefined,
            "null" => PrimitiveName::Null,
            "symbol" => PrimitiveName::Symbol,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveName::String => "string",
            PrimitiveName::Number => "number",
            PrimitiveName::BigInt => "bigint",
            PrimitiveName::Boolean => "boolean",
            PrimitiveName::Undefined => "undefined",
            PrimitiveName::Null => "null",
            PrimitiveName::Symbol => "symbol",
        }
    }
}

/// A resolved `nameRef`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Special(SpecialName),
    Primitive(PrimitiveName),
    Global(String),
}

impl Intrinsic {
    /// Resolve a raw `nameRef`. Returns `None` for a special or primitive
    /// name outside its fixed set.
    pub fn resolve(category: NameCategory, name: &str) -> Option<Self> {
        match category {
            NameCategory::Special => SpecialName::from_name(name).map(Intrinsic::Special),
            NameCategory::Primitive => PrimitiveName::from_name(name).map(Intrinsic::Primitive),
            NameCategory::Global => Some(Intrinsic::Global(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Intrinsic::Special(special) => special.as_str(),
            Intrinsic::Primitive(primitive) => primitive.as_str(),
            Intrinsic::Global(name) => name,
        }
    }
}

// =============================================================================
// Shared leaves
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositeOp {
    Union,
    Intersection,
}

impl CompositeOp {
    /// Operator token used when rendering (`|` or `&`).
    pub const fn token(self) -> &'static str {
        match self {
            CompositeOp::Union => "|",
            CompositeOp::Intersection => "&",
        }
    }
}

/// A literal type's value.
///
/// Serialized adjacently tagged: `{"type": "string", "value": "a"}`. Bigints
/// travel as decimal strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    #[serde(rename = "bigint", with = "bigint_string")]
    BigInt(i128),
    Boolean(bool),
}

mod bigint_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
        use serde::de::Error;
        let text = String::deserialize(deserializer)?;
        text.trim_end_matches('n')
            .parse()
            .map_err(|_| Error::custom(format!("invalid bigint literal: '{text}'")))
    }
}

/// Key of a member projection (`T["a"]`, `T[0]`, `T[typeof sym]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MemberKey {
    /// A symbolic or computed key, by name.
    Name { name: String },
    Literal { value: LiteralValue },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexKeyKind {
    String,
    Number,
}

impl IndexKeyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            IndexKeyKind::String => "string",
            IndexKeyKind::Number => "number",
        }
    }
}

/// `[keyName: string | number]: valueType`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndexSignature<T> {
    pub key_name: String,
    pub key_kind: IndexKeyKind,
    pub value_type: T,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

/// `[keyName in keyInType]: valueType`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MappedIndexSignature<T> {
    pub key_name: String,
    pub key_in_type: T,
    pub value_type: T,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertySignature<T> {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: T,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

// =============================================================================
// TypeData
// =============================================================================

/// A linked type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeData {
    Intrinsic(Intrinsic),
    /// A generic parameter name in scope (`T`).
    GenericParam { name: String },
    /// Reference to a named type of the same module.
    LocalRef { name: String, target: NamedTypeId },
    /// Reference to an exported named type of another module, either through
    /// a named import alias or `namespace.name`.
    ImportedRef {
        name: String,
        namespace: Option<String>,
        target: NamedTypeId,
    },
    Literal(LiteralValue),
    Composite { op: CompositeOp, members: Vec<TypeData> },
    Tuple(Vec<TypeData>),
    Array(Box<TypeData>),
    /// `Name<Args>`; `target` is set when `Name` resolves to a named type.
    GenericInstance {
        name: String,
        target: Option<NamedTypeId>,
        type_args: Vec<TypeData>,
    },
    Function(FunctionShape),
    Keyof(Box<TypeData>),
    Member { of: Box<TypeData>, key: MemberKey },
    Interface(Box<InterfaceShape>),
}

impl TypeData {
    /// Short kind name used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeData::Intrinsic(_) => "name reference",
            TypeData::GenericParam { .. } => "generic parameter",
            TypeData::LocalRef { .. } => "local reference",
            TypeData::ImportedRef { .. } => "imported reference",
            TypeData::Literal(_) => "literal",
            TypeData::Composite {
                op: CompositeOp::Union,
                ..
            } => "union",
            TypeData::Composite {
                op: CompositeOp::Intersection,
                ..
            } => "intersection",
            TypeData::Tuple(_) => "tuple",
            TypeData::Array(_) => "array",
            TypeData::GenericInstance { .. } => "generic instance",
            TypeData::Function(_) => "function",
            TypeData::Keyof(_) => "keyof",
            TypeData::Member { .. } => "member",
            TypeData::Interface(_) => "interface",
        }
    }

    /// Target of a local or imported reference.
    pub const fn ref_target(&self) -> Option<NamedTypeId> {
        match self {
            TypeData::LocalRef { target, .. } | TypeData::ImportedRef { target, .. } => {
                Some(*target)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub ty: Option<TypeData>,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenericParamInfo {
    pub name: String,
    pub constraint: Option<TypeData>,
    pub default: Option<TypeData>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: Box<TypeData>,
    pub generics: Vec<GenericParamInfo>,
}

/// A linked interface body.
///
/// The linker guarantees at most one plain index signature, and that a mapped
/// index signature never appears together with anything else.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct InterfaceShape {
    pub index_signature: Option<IndexSignature<TypeData>>,
    pub mapped_index_signature: Option<MappedIndexSignature<TypeData>>,
    pub properties: Vec<PropertySignature<TypeData>>,
}

impl InterfaceShape {
    pub fn property(&self, name: &str) -> Option<&PropertySignature<TypeData>> {
        self.properties.iter().find(|prop| prop.name == name)
    }
}
