//! Rendering linked types for diagnostics.
//!
//! Named types render as their own name. Anonymous type expressions render
//! structurally:
//!
//! | Kind | Rendering |
//! |------|-----------|
//! | array | `T[]` |
//! | tuple | `[T, U]` |
//! | union / intersection | `A \| B` / `A & B` |
//! | member | `Parent["key"]` |
//! | keyof | `keyof T` |
//! | literal | JSON form (`"a"`, `12`, `true`, `3n`) |
//! | interface | `{ a: string; b?: number }` |
//! | function | `(a: T, b?: U) => R` |
//! | generic instance | `Name<T>` |

use crate::graph::TypeGraph;
use crate::types::{
    CompositeOp, FunctionShape, GenericParamInfo, InterfaceShape, LiteralValue, MemberKey,
    NamedTypeId, TypeData,
};
use tsv_common::number_to_string;

pub struct TypeFormatter<'g> {
    graph: &'g TypeGraph,
}

impl<'g> TypeFormatter<'g> {
    pub const fn new(graph: &'g TypeGraph) -> Self {
        Self { graph }
    }

    pub fn format_named(&self, id: NamedTypeId) -> String {
        self.graph.named_type(id).name.clone()
    }

    pub fn format(&self, ty: &TypeData) -> String {
        match ty {
            TypeData::Intrinsic(intrinsic) => intrinsic.name().to_string(),
            TypeData::GenericParam { name } => name.clone(),
            TypeData::LocalRef { target, .. } => self.format_named(*target),
            TypeData::ImportedRef {
                name, namespace, ..
            } => match namespace {
                Some(namespace) => format!("{namespace}.{name}"),
                None => name.clone(),
            },
            TypeData::Literal(literal) => format_literal(literal),
            TypeData::Composite { op, members } => self.format_composite(*op, members),
            TypeData::Tuple(items) => {
                let items: Vec<String> = items.iter().map(|item| self.format(item)).collect();
                format!("[{}]", items.join(", "))
            }
            TypeData::Array(item) => format!("{}[]", self.format_operand(item)),
            TypeData::GenericInstance {
                name, type_args, ..
            } => {
                let args: Vec<String> = type_args.iter().map(|arg| self.format(arg)).collect();
                format!("{name}<{}>", args.join(", "))
            }
            TypeData::Function(shape) => self.format_function(shape),
            TypeData::Keyof(of) => format!("keyof {}", self.format_operand(of)),
            TypeData::Member { of, key } => {
                let key = match key {
                    MemberKey::Name { name } => name.clone(),
                    MemberKey::Literal { value } => format_literal(value),
                };
                format!("{}[{key}]", self.format_operand(of))
            }
            TypeData::Interface(shape) => self.format_interface(shape),
        }
    }

    /// Format a type that appears as an operand of a postfix or prefix
    /// operator, parenthesizing where precedence requires it.
    fn format_operand(&self, ty: &TypeData) -> String {
        match ty {
            TypeData::Composite { .. } | TypeData::Function(_) | TypeData::Keyof(_) => {
                format!("({})", self.format(ty))
            }
            _ => self.format(ty),
        }
    }

    fn format_composite(&self, op: CompositeOp, members: &[TypeData]) -> String {
        if members.is_empty() {
            return match op {
                CompositeOp::Union => "never".to_string(),
                CompositeOp::Intersection => "unknown".to_string(),
            };
        }
        let separator = format!(" {} ", op.token());
        members
            .iter()
            .map(|member| match member {
                TypeData::Composite { .. } | TypeData::Function(_) => {
                    format!("({})", self.format(member))
                }
                _ => self.format(member),
            })
            .collect::<Vec<_>>()
            .join(&separator)
    }

    fn format_function(&self, shape: &FunctionShape) -> String {
        let params: Vec<String> = shape
            .params
            .iter()
            .map(|param| {
                let marker = if param.optional { "?" } else { "" };
                match &param.ty {
                    Some(ty) => format!("{}{marker}: {}", param.name, self.format(ty)),
                    None => format!("{}{marker}", param.name),
                }
            })
            .collect();
        format!(
            "{}({}) => {}",
            self.format_generics(&shape.generics),
            params.join(", "),
            self.format(&shape.return_type)
        )
    }

    fn format_generics(&self, generics: &[GenericParamInfo]) -> String {
        if generics.is_empty() {
            return String::new();
        }
        let params: Vec<String> = generics
            .iter()
            .map(|param| {
                let mut out = param.name.clone();
                if let Some(constraint) = &param.constraint {
                    out.push_str(" extends ");
                    out.push_str(&self.format(constraint));
                }
                if let Some(default) = &param.default {
                    out.push_str(" = ");
                    out.push_str(&self.format(default));
                }
                out
            })
            .collect();
        format!("<{}>", params.join(", "))
    }

    fn format_interface(&self, shape: &InterfaceShape) -> String {
        let mut entries = Vec::new();
        if let Some(index) = &shape.index_signature {
            entries.push(format!(
                "{}[{}: {}]: {}",
                if index.readonly { "readonly " } else { "" },
                index.key_name,
                index.key_kind.as_str(),
                self.format(&index.value_type)
            ));
        }
        if let Some(mapped) = &shape.mapped_index_signature {
            entries.push(format!(
                "{}[{} in {}]{}: {}",
                if mapped.readonly { "readonly " } else { "" },
                mapped.key_name,
                self.format(&mapped.key_in_type),
                if mapped.optional { "?" } else { "" },
                self.format(&mapped.value_type)
            ));
        }
        for prop in &shape.properties {
            entries.push(format!(
                "{}{}{}: {}",
                if prop.readonly { "readonly " } else { "" },
                prop.name,
                if prop.optional { "?" } else { "" },
                self.format(&prop.ty)
            ));
        }
        if entries.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", entries.join("; "))
        }
    }
}

/// JSON-style rendering of a literal (`"a"`, `12`, `true`, `3n`).
pub fn format_literal(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::String(s) => {
            serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
        }
        LiteralValue::Number(n) => number_to_string(*n),
        LiteralValue::BigInt(n) => format!("{n}n"),
        LiteralValue::Boolean(b) => b.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/display_tests.rs"]
mod tests;
