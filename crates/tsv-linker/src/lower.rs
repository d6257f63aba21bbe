//! Lowering raw type expressions into linked `TypeData`.
//!
//! Lowering runs in the define phase, when every reachable module is already
//! declared. It only reads declarations (names, exported flags), never
//! bodies, so the order in which modules are defined does not matter.

use crate::error::{InterfaceShapeError, LinkError};
use rustc_hash::FxHashMap;
use tsv_graph::{
    CompositeOp, FunctionShape, GenericParamInfo, IndexSignature, InterfaceShape, Intrinsic,
    MappedIndexSignature, ModuleId, NameCategory, NamedTypeId, ParamInfo, PropertySignature,
    RawGenericParam, RawInterface, RawInterfaceEntry, RawType, TypeData, TypeGraph,
};

/// Names an importing module can see besides its own declarations.
#[derive(Debug, Default)]
pub(crate) struct ImportScope {
    /// Local name of each named import → imported type.
    pub aliases: FxHashMap<String, NamedTypeId>,
    /// Local namespace → imported module.
    pub namespaces: FxHashMap<String, ModuleId>,
}

/// Lowers the type expressions of one named type.
pub(crate) struct Lowerer<'a> {
    graph: &'a TypeGraph,
    module: ModuleId,
    scope: &'a ImportScope,
    type_name: &'a str,
}

impl<'a> Lowerer<'a> {
    pub(crate) const fn new(
        graph: &'a TypeGraph,
        module: ModuleId,
        scope: &'a ImportScope,
        type_name: &'a str,
    ) -> Self {
        Self {
            graph,
            module,
            scope,
            type_name,
        }
    }

    fn module_path(&self) -> String {
        self.graph.module(self.module).path.clone()
    }

    fn unresolved(&self, reference: &str) -> LinkError {
        LinkError::UnresolvedReference {
            module: self.module_path(),
            type_name: self.type_name.to_string(),
            reference: reference.to_string(),
        }
    }

    pub(crate) fn lower_generics(
        &self,
        params: &[RawGenericParam],
    ) -> Result<Vec<GenericParamInfo>, LinkError> {
        params
            .iter()
            .map(|param| {
                Ok(GenericParamInfo {
                    name: param.name.clone(),
                    constraint: self.lower_opt(param.constraint.as_ref())?,
                    default: self.lower_opt(param.default.as_ref())?,
                })
            })
            .collect()
    }

    fn lower_opt(&self, raw: Option<&RawType>) -> Result<Option<TypeData>, LinkError> {
        raw.map(|raw| self.lower(raw)).transpose()
    }

    fn lower_all(&self, raws: &[RawType]) -> Result<Vec<TypeData>, LinkError> {
        raws.iter().map(|raw| self.lower(raw)).collect()
    }

    pub(crate) fn lower(&self, raw: &RawType) -> Result<TypeData, LinkError> {
        Ok(match raw {
            RawType::NameRef { category, ref_name } => {
                let intrinsic = Intrinsic::resolve(*category, ref_name).ok_or_else(|| {
                    LinkError::UnknownIntrinsic {
                        module: self.module_path(),
                        type_name: self.type_name.to_string(),
                        category: match category {
                            NameCategory::Special => "special",
                            NameCategory::Primitive => "primitive",
                            NameCategory::Global => "global",
                        },
                        name: ref_name.clone(),
                    }
                })?;
                TypeData::Intrinsic(intrinsic)
            }
            RawType::GenericParamName { name } => TypeData::GenericParam { name: name.clone() },
            RawType::LocalRef { ref_name } => TypeData::LocalRef {
                name: ref_name.clone(),
                target: self.resolve_local(ref_name)?,
            },
            RawType::ImportedRef {
                ref_name,
                namespace,
            } => TypeData::ImportedRef {
                name: ref_name.clone(),
                namespace: namespace.clone(),
                target: self.resolve_imported(ref_name, namespace.as_deref())?,
            },
            RawType::Literal { value } => TypeData::Literal(value.clone()),
            RawType::Composite { op, members } => TypeData::Composite {
                op: *op,
                members: self.lower_all(members)?,
            },
            RawType::Tuple { items } => TypeData::Tuple(self.lower_all(items)?),
            RawType::Array { item } => TypeData::Array(Box::new(self.lower(item)?)),
            RawType::GenericInstance {
                generic_name,
                type_args,
            } => TypeData::GenericInstance {
                name: generic_name.clone(),
                target: self.try_resolve_generic(generic_name),
                type_args: self.lower_all(type_args)?,
            },
            RawType::Function(function) => TypeData::Function(FunctionShape {
                params: function
                    .params
                    .iter()
                    .map(|param| {
                        Ok(ParamInfo {
                            name: param.name.clone(),
                            ty: self.lower_opt(param.ty.as_ref())?,
                            optional: param.optional,
                        })
                    })
                    .collect::<Result<_, LinkError>>()?,
                return_type: Box::new(self.lower(&function.return_type)?),
                generics: self.lower_generics(&function.generics)?,
            }),
            RawType::Keyof { of } => TypeData::Keyof(Box::new(self.lower(of)?)),
            RawType::Member { of, key } => TypeData::Member {
                of: Box::new(self.lower(of)?),
                key: key.clone(),
            },
            RawType::Interface(interface) => self.lower_interface(interface)?,
        })
    }

    fn resolve_local(&self, name: &str) -> Result<NamedTypeId, LinkError> {
        self.graph
            .module(self.module)
            .named_type(name)
            .ok_or_else(|| self.unresolved(name))
    }

    fn resolve_imported(
        &self,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<NamedTypeId, LinkError> {
        let Some(namespace) = namespace else {
            return self
                .scope
                .aliases
                .get(name)
                .copied()
                .ok_or_else(|| self.unresolved(name));
        };

        let &module = self.scope.namespaces.get(namespace).ok_or_else(|| {
            LinkError::UnknownNamespace {
                module: self.module_path(),
                type_name: self.type_name.to_string(),
                namespace: namespace.to_string(),
            }
        })?;
        exported_member(self.graph, module, name).ok_or_else(|| {
            LinkError::UnknownExportedMember {
                module: self.module_path(),
                from: self.graph.module(module).path.clone(),
                member: name.to_string(),
            }
        })
    }

    /// Generic names may well be ambient (`Array`, `Record`), so a miss here
    /// is not an error.
    fn try_resolve_generic(&self, name: &str) -> Option<NamedTypeId> {
        if let Some((namespace, member)) = name.split_once('.') {
            let &module = self.scope.namespaces.get(namespace)?;
            return exported_member(self.graph, module, member);
        }
        self.graph
            .module(self.module)
            .named_type(name)
            .or_else(|| self.scope.aliases.get(name).copied())
    }

    /// Fold interface entries into a shape; `extends` becomes an intersection
    /// of the bases and the interface's own body.
    fn lower_interface(&self, interface: &RawInterface) -> Result<TypeData, LinkError> {
        let invalid = |reason| LinkError::InvalidInterface {
            module: self.module_path(),
            type_name: self.type_name.to_string(),
            reason,
        };

        let mut shape = InterfaceShape::default();
        for entry in &interface.entries {
            match entry {
                RawInterfaceEntry::IndexSignature(sig) => {
                    if shape.index_signature.is_some() {
                        return Err(invalid(InterfaceShapeError::MultipleIndexSignatures));
                    }
                    shape.index_signature = Some(IndexSignature {
                        key_name: sig.key_name.clone(),
                        key_kind: sig.key_kind,
                        value_type: self.lower(&sig.value_type)?,
                        optional: sig.optional,
                        readonly: sig.readonly,
                    });
                }
                RawInterfaceEntry::MappedIndexSignature(sig) => {
                    if shape.mapped_index_signature.is_some() {
                        return Err(invalid(InterfaceShapeError::MappedWithOtherEntries));
                    }
                    shape.mapped_index_signature = Some(MappedIndexSignature {
                        key_name: sig.key_name.clone(),
                        key_in_type: self.lower(&sig.key_in_type)?,
                        value_type: self.lower(&sig.value_type)?,
                        optional: sig.optional,
                        readonly: sig.readonly,
                    });
                }
                RawInterfaceEntry::Property(prop) => {
                    if shape.property(&prop.name).is_some() {
                        return Err(invalid(InterfaceShapeError::DuplicateProperty(
                            prop.name.clone(),
                        )));
                    }
                    shape.properties.push(PropertySignature {
                        name: prop.name.clone(),
                        ty: self.lower(&prop.ty)?,
                        optional: prop.optional,
                        readonly: prop.readonly,
                    });
                }
            }
        }
        if shape.mapped_index_signature.is_some()
            && (shape.index_signature.is_some() || !shape.properties.is_empty())
        {
            return Err(invalid(InterfaceShapeError::MappedWithOtherEntries));
        }

        if interface.extends.is_empty() {
            return Ok(TypeData::Interface(Box::new(shape)));
        }
        let mut members = self.lower_all(&interface.extends)?;
        members.push(TypeData::Interface(Box::new(shape)));
        Ok(TypeData::Composite {
            op: CompositeOp::Intersection,
            members,
        })
    }
}

/// `name` in `module`, provided it is exported.
pub(crate) fn exported_member(
    graph: &TypeGraph,
    module: ModuleId,
    name: &str,
) -> Option<NamedTypeId> {
    graph
        .module(module)
        .named_type(name)
        .filter(|&id| graph.named_type(id).exported)
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
