//! Raw (unlinked) type graph.
//!
//! One `RawModule` per module path, references between types spelled as plain
//! names. This is the hand-off format from an external parser; the JSON form
//! uses camelCase keys and a `"kind"` tag on type expressions:
//!
//! ```json
//! {
//!   "imports": [{ "fromPath": "./b", "members": [{ "exportedName": "B" }] }],
//!   "namedTypes": [{
//!     "name": "A",
//!     "exported": true,
//!     "body": { "kind": "array", "item": { "kind": "importedRef", "refName": "B" } }
//!   }]
//! }
//! ```
//!
//! The small constructors on `RawType`, `RawNamedType` and `RawModule` exist
//! for embedders that build graphs by hand (and for tests).

use crate::types::{
    CompositeOp, IndexKeyKind, IndexSignature, LiteralValue, MappedIndexSignature, MemberKey,
    NameCategory, PropertySignature,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Modules and imports
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawModule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<RawImport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaced_imports: Vec<RawNamespacedImport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub named_types: Vec<RawNamedType>,
}

impl RawModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, named_type: RawNamedType) -> Self {
        self.named_types.push(named_type);
        self
    }

    /// `import { members } from "from_path"`; each member is `(exported, alias)`.
    pub fn with_import<'a>(
        mut self,
        from_path: impl Into<String>,
        members: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Self {
        self.imports.push(RawImport {
            from_path: from_path.into(),
            members: members
                .into_iter()
                .map(|(exported_name, local_alias)| RawImportMember {
                    exported_name: exported_name.to_string(),
                    local_alias: local_alias.map(str::to_string),
                })
                .collect(),
        });
        self
    }

    /// `import * as local_namespace from "from_path"`
    pub fn with_namespace_import(
        mut self,
        from_path: impl Into<String>,
        local_namespace: impl Into<String>,
    ) -> Self {
        self.namespaced_imports.push(RawNamespacedImport {
            from_path: from_path.into(),
            local_namespace: local_namespace.into(),
        });
        self
    }

    /// Every module path this module imports from, in declaration order.
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .map(|import| import.from_path.as_str())
            .chain(
                self.namespaced_imports
                    .iter()
                    .map(|import| import.from_path.as_str()),
            )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawImport {
    pub from_path: String,
    pub members: Vec<RawImportMember>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawImportMember {
    pub exported_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_alias: Option<String>,
}

impl RawImportMember {
    /// Name the member is bound to in the importing module.
    pub fn local_name(&self) -> &str {
        self.local_alias.as_deref().unwrap_or(&self.exported_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawNamespacedImport {
    pub from_path: String,
    pub local_namespace: String,
}

// =============================================================================
// Named types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawNamedType {
    pub name: String,
    #[serde(default)]
    pub exported: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_params: Vec<RawGenericParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
    pub body: RawType,
}

impl RawNamedType {
    pub fn new(name: impl Into<String>, body: RawType) -> Self {
        Self {
            name: name.into(),
            exported: false,
            generic_params: Vec::new(),
            doc_comment: None,
            body,
        }
    }

    pub fn exported(name: impl Into<String>, body: RawType) -> Self {
        Self {
            exported: true,
            ..Self::new(name, body)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawGenericParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<RawType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<RawType>,
}

// =============================================================================
// Type expressions
// =============================================================================

/// A type expression whose references are plain names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    deny_unknown_fields
)]
pub enum RawType {
    NameRef {
        category: NameCategory,
        ref_name: String,
    },
    GenericParamName {
        name: String,
    },
    LocalRef {
        ref_name: String,
    },
    ImportedRef {
        ref_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },
    Literal {
        value: LiteralValue,
    },
    Composite {
        op: CompositeOp,
        members: Vec<RawType>,
    },
    Tuple {
        items: Vec<RawType>,
    },
    Array {
        item: Box<RawType>,
    },
    GenericInstance {
        generic_name: String,
        type_args: Vec<RawType>,
    },
    Function(RawFunction),
    Keyof {
        of: Box<RawType>,
    },
    Member {
        of: Box<RawType>,
        key: MemberKey,
    },
    Interface(RawInterface),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawFunction {
    pub params: Vec<RawParam>,
    pub return_type: Box<RawType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<RawGenericParam>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawParam {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<RawType>,
    #[serde(default)]
    pub optional: bool,
}

/// An interface body: `extends` clauses plus its entries in declaration order.
///
/// Serializes as `{extends?, entries}`. Deserializing also accepts the flat
/// `{indexSignature?, mappedIndexSignature?, properties?}` form; its members
/// are appended to `entries` in that order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "InterfaceRepr")]
pub struct RawInterface {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<RawType>,
    #[serde(default)]
    pub entries: Vec<RawInterfaceEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct InterfaceRepr {
    #[serde(default)]
    extends: Vec<RawType>,
    #[serde(default)]
    entries: Vec<RawInterfaceEntry>,
    #[serde(default)]
    index_signature: Option<IndexSignature<RawType>>,
    #[serde(default)]
    mapped_index_signature: Option<MappedIndexSignature<RawType>>,
    #[serde(default)]
    properties: Vec<PropertySignature<RawType>>,
}

impl From<InterfaceRepr> for RawInterface {
    fn from(repr: InterfaceRepr) -> Self {
        let mut entries = repr.entries;
        entries.extend(repr.index_signature.map(RawInterfaceEntry::IndexSignature));
        entries.extend(
            repr.mapped_index_signature
                .map(RawInterfaceEntry::MappedIndexSignature),
        );
        entries.extend(repr.properties.into_iter().map(RawInterfaceEntry::Property));
        Self {
            extends: repr.extends,
            entries,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawInterfaceEntry {
    IndexSignature(IndexSignature<RawType>),
    MappedIndexSignature(MappedIndexSignature<RawType>),
    Property(PropertySignature<RawType>),
}

impl RawInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extending(mut self, base: RawType) -> Self {
        self.extends.push(base);
        self
    }

    pub fn property(mut self, name: impl Into<String>, ty: RawType) -> Self {
        self.entries
            .push(RawInterfaceEntry::Property(PropertySignature {
                name: name.into(),
                ty,
                optional: false,
                readonly: false,
            }));
        self
    }

    pub fn optional_property(mut self, name: impl Into<String>, ty: RawType) -> Self {
        self.entries
            .push(RawInterfaceEntry::Property(PropertySignature {
                name: name.into(),
                ty,
                optional: true,
                readonly: false,
            }));
        self
    }

    pub fn index_signature(mut self, key_kind: IndexKeyKind, value_type: RawType) -> Self {
        self.entries
            .push(RawInterfaceEntry::IndexSignature(IndexSignature {
                key_name: "key".to_string(),
                key_kind,
                value_type,
                optional: false,
                readonly: false,
            }));
        self
    }

    pub fn mapped_index_signature(mut self, key_in_type: RawType, value_type: RawType) -> Self {
        self.entries
            .push(RawInterfaceEntry::MappedIndexSignature(MappedIndexSignature {
                key_name: "K".to_string(),
                key_in_type,
                value_type,
                optional: false,
                readonly: false,
            }));
        self
    }
}

impl From<RawInterface> for RawType {
    fn from(interface: RawInterface) -> Self {
        RawType::Interface(interface)
    }
}

impl RawType {
    pub fn primitive(name: &str) -> Self {
        RawType::NameRef {
            category: NameCategory::Primitive,
            ref_name: name.to_string(),
        }
    }

    pub fn special(name: &str) -> Self {
        RawType::NameRef {
            category: NameCategory::Special,
            ref_name: name.to_string(),
        }
    }

    pub fn global(name: &str) -> Self {
        RawType::NameRef {
            category: NameCategory::Global,
            ref_name: name.to_string(),
        }
    }

    pub fn local(name: &str) -> Self {
        RawType::LocalRef {
            ref_name: name.to_string(),
        }
    }

    pub fn imported(name: &str) -> Self {
        RawType::ImportedRef {
            ref_name: name.to_string(),
            namespace: None,
        }
    }

    pub fn qualified(namespace: &str, name: &str) -> Self {
        RawType::ImportedRef {
            ref_name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }

    pub fn literal(value: LiteralValue) -> Self {
        RawType::Literal { value }
    }

    pub fn string_literal(value: &str) -> Self {
        RawType::literal(LiteralValue::String(value.to_string()))
    }

    pub fn number_literal(value: f64) -> Self {
        RawType::literal(LiteralValue::Number(value))
    }

    pub fn union(members: Vec<RawType>) -> Self {
        RawType::Composite {
            op: CompositeOp::Union,
            members,
        }
    }

    pub fn intersection(members: Vec<RawType>) -> Self {
        RawType::Composite {
            op: CompositeOp::Intersection,
            members,
        }
    }

    pub fn array(item: RawType) -> Self {
        RawType::Array {
            item: Box::new(item),
        }
    }

    pub fn tuple(items: Vec<RawType>) -> Self {
        RawType::Tuple { items }
    }

    pub fn keyof(of: RawType) -> Self {
        RawType::Keyof { of: Box::new(of) }
    }

    /// `of[key]` with a literal key.
    pub fn member(of: RawType, key: LiteralValue) -> Self {
        RawType::Member {
            of: Box::new(of),
            key: MemberKey::Literal { value: key },
        }
    }
}

#[cfg(test)]
#[path = "../tests/raw_tests.rs"]
mod tests;
