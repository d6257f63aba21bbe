//! Structural conformance checking.
//!
//! [`Validator`] walks a linked type and a runtime value together and answers
//! whether the value conforms. The walk dispatches on the type's kind:
//!
//! | Kind | Accepts |
//! |------|---------|
//! | primitive | values of exactly that category (`null` is its own) |
//! | special | `any`/`unknown`/`void`: all, `never`: none, `object`: typeof "object" |
//! | global | values whose prototype chain has a constructor of that name |
//! | literal | the literal itself (same type and value) |
//! | interface | objects whose index signature and declared properties conform |
//! | array / tuple | arrays whose items conform (tuples: exact length) |
//! | union / intersection | any member / every member |
//! | keyof / member | see `projection` |
//! | function | any callable |
//!
//! Named-type references are followed transparently; diagnostics name the
//! referenced type. Generics are not instantiated and raise
//! [`CheckError::Unimplemented`].
//!
//! ## Match scores
//!
//! Interface and intersection failures carry a score in `0.0..=1.0` so a
//! failing union can report the member that came closest. Scores never
//! influence whether a value conforms.

use crate::diagnostics::{Cause, Context, TypeRef, UnmatchEntry, UnmatchTrail, Verdict};
use crate::error::CheckError;
use crate::format::format_trail;
use crate::options::ValidatorOptions;
use serde::Serialize;
use tracing::{debug, trace};
use tsv_common::{TypeofTag, Value, coerce_to_number, normalize_module_path};
use tsv_graph::{
    CompositeOp, IndexKeyKind, InterfaceShape, Intrinsic, LiteralValue, NamedTypeId, SpecialName,
    TypeData, TypeGraph,
};

pub(crate) type Outcome<'a> = Result<Verdict<'a>, CheckError>;

/// Result of [`Validator::check`]: `error` is set exactly when the value does
/// not conform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub conform: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Checks values against the named types of a linked graph.
///
/// Read-only over the graph, so one validator can serve concurrent `check`
/// calls.
#[derive(Clone, Debug)]
pub struct Validator<'g> {
    graph: &'g TypeGraph,
    options: ValidatorOptions,
}

impl<'g> Validator<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self::with_options(graph, ValidatorOptions::default())
    }

    pub fn with_options(graph: &'g TypeGraph, options: ValidatorOptions) -> Self {
        debug!(
            modules = graph.module_count(),
            types = graph.named_type_count(),
            accept_additional_props = options.accept_additional_props,
            "validator created"
        );
        Self { graph, options }
    }

    pub const fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    pub const fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// The exported type `type_name` of the module at `module_path`.
    ///
    /// `module_path` may be given in any spelling the linker accepts
    /// (`./a.ts` finds `./a`).
    pub fn resolve(&self, module_path: &str, type_name: &str) -> Result<NamedTypeId, CheckError> {
        let canonical =
            normalize_module_path(module_path, None).unwrap_or_else(|_| module_path.to_string());
        let module =
            self.graph
                .module_by_path(&canonical)
                .ok_or_else(|| CheckError::UnknownModule {
                    path: module_path.to_string(),
                })?;
        let id = module
            .named_type(type_name)
            .ok_or_else(|| CheckError::UnknownType {
                module: module.path.clone(),
                name: type_name.to_string(),
            })?;
        if !self.graph.named_type(id).exported {
            return Err(CheckError::NotExported {
                module: module.path.clone(),
                name: type_name.to_string(),
            });
        }
        Ok(id)
    }

    /// Check `value` against an exported named type and render any mismatch.
    #[tracing::instrument(level = "debug", skip(self, value))]
    pub fn check(
        &self,
        module_path: &str,
        type_name: &str,
        value: &Value,
    ) -> Result<CheckResult, CheckError> {
        Ok(match self.validate(module_path, type_name, value)? {
            Verdict::Valid => CheckResult {
                conform: true,
                error: None,
            },
            Verdict::Invalid(trail) => {
                let error = format_trail(self.graph, &trail);
                debug!(%error, "value does not conform");
                CheckResult {
                    conform: false,
                    error: Some(error),
                }
            }
        })
    }

    /// Like [`check`](Self::check), but returns the unrendered verdict.
    pub fn validate<'a>(
        &'a self,
        module_path: &str,
        type_name: &str,
        value: &'a Value,
    ) -> Outcome<'a> {
        let id = self.resolve(module_path, type_name)?;
        self.check_named(id, value, None)
    }

    /// Check `value` against a named type, exported or not.
    pub fn check_named<'a>(
        &'a self,
        id: NamedTypeId,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        let body = self.body_of(id)?;
        self.check_node(TypeRef::Named(id), body, value, context)
    }

    /// Check `value` against an anonymous type expression of the graph.
    pub fn check_type<'a>(
        &'a self,
        ty: &'a TypeData,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        self.check_node(TypeRef::Node(ty), ty, value, context)
    }

    pub(crate) fn body_of(&self, id: NamedTypeId) -> Result<&'g TypeData, CheckError> {
        self.graph
            .named_type(id)
            .body()
            .ok_or_else(|| CheckError::UndefinedBody {
                name: self.graph.qualified_name(id),
            })
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// `display` is what diagnostics call the type; `ty` is its structure.
    fn check_node<'a>(
        &'a self,
        display: TypeRef<'a>,
        ty: &'a TypeData,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        trace!(kind = ty.kind_name(), value = value.primitive_name(), "check");
        match ty {
            TypeData::Intrinsic(intrinsic) => {
                Ok(Self::check_intrinsic(display, intrinsic, value, context))
            }
            TypeData::GenericParam { .. } => Err(CheckError::Unimplemented {
                feature: "generic type parameters",
            }),
            TypeData::GenericInstance { .. } => Err(CheckError::Unimplemented {
                feature: "generic type instantiation",
            }),
            TypeData::LocalRef { target, .. } | TypeData::ImportedRef { target, .. } => {
                self.check_named(*target, value, context)
            }
            TypeData::Literal(literal) => Ok(if literal_matches(literal, value) {
                Verdict::Valid
            } else {
                Verdict::fail(value, display, None, context)
            }),
            TypeData::Composite {
                op: CompositeOp::Union,
                members,
            } => self.check_union(display, members, value, context),
            TypeData::Composite {
                op: CompositeOp::Intersection,
                members,
            } => self.check_intersection(display, members, value, context),
            TypeData::Tuple(items) => self.check_tuple(display, items, value, context),
            TypeData::Array(item) => self.check_array(display, item, value, context),
            TypeData::Function(_) => Ok(if matches!(value, Value::Function(_)) {
                Verdict::Valid
            } else {
                Verdict::fail(value, display, Some(Cause::NotAFunction), context)
            }),
            TypeData::Keyof(of) => self.check_keyof(display, of, value, context),
            TypeData::Member { of, key } => self.check_member(display, of, key, value, context),
            TypeData::Interface(shape) => self.check_interface(display, shape, value, context),
        }
    }

    fn check_intrinsic<'a>(
        display: TypeRef<'a>,
        intrinsic: &'a Intrinsic,
        value: &'a Value,
        context: Option<Context>,
    ) -> Verdict<'a> {
        let (conform, cause) = match intrinsic {
            Intrinsic::Primitive(name) => (value.primitive_name() == name.as_str(), None),
            // `void` accepts every value, like `any`.
            Intrinsic::Special(SpecialName::Any | SpecialName::Unknown | SpecialName::Void) => {
                (true, None)
            }
            Intrinsic::Special(SpecialName::Never) => (false, None),
            Intrinsic::Special(SpecialName::Object) => {
                (value.typeof_tag() == TypeofTag::Object, None)
            }
            Intrinsic::Global(name) => (
                value.constructor_chain().contains(&name.as_str()),
                Some(Cause::NotInstanceOf(name.as_str())),
            ),
        };
        if conform {
            Verdict::Valid
        } else {
            Verdict::fail(value, display, cause, context)
        }
    }

    // =========================================================================
    // Containers
    // =========================================================================

    fn check_interface<'a>(
        &'a self,
        display: TypeRef<'a>,
        shape: &'a InterfaceShape,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        if !value.is_object_like() {
            return Ok(Verdict::fail(
                value,
                display,
                Some(Cause::NotAnObject),
                context,
            ));
        }
        if shape.mapped_index_signature.is_some() {
            return Err(CheckError::Unimplemented {
                feature: "mapped index signatures",
            });
        }

        // The index signature short-circuits on the first bad entry and
        // carries no score.
        if let Some(signature) = &shape.index_signature {
            for (key, item) in value.own_entries() {
                if !key_matches_kind(&key, signature.key_kind) {
                    let cause = Cause::InvalidIndexKey {
                        key: key.into_owned(),
                        kind: signature.key_kind,
                    };
                    return Ok(Verdict::fail(value, display, Some(cause), context));
                }
                let item_context = Context::Property(key.into_owned());
                if let Verdict::Invalid(mut trail) =
                    self.check_type(&signature.value_type, item, Some(item_context))?
                {
                    trail.push(entry(value, display, None, context, None));
                    return Ok(Verdict::Invalid(trail));
                }
            }
        }

        if shape.properties.is_empty() {
            return Ok(Verdict::Valid);
        }

        let mut valid = 0usize;
        let mut present = 0usize;
        let mut first_failure: Option<(UnmatchTrail<'a>, Option<Cause<'a>>)> = None;
        for property in &shape.properties {
            match value.get_own(&property.name) {
                None if property.optional => valid += 1,
                None => {
                    first_failure.get_or_insert_with(|| {
                        (
                            UnmatchTrail::new(),
                            Some(Cause::MissingProperty(&property.name)),
                        )
                    });
                }
                Some(item) => {
                    present += 1;
                    if property.optional && matches!(item, Value::Undefined) {
                        valid += 1;
                        continue;
                    }
                    let item_context = Context::Property(property.name.clone());
                    match self.check_type(&property.ty, item, Some(item_context))? {
                        Verdict::Valid => valid += 1,
                        Verdict::Invalid(trail) => {
                            first_failure.get_or_insert((trail, None));
                        }
                    }
                }
            }
        }

        let Some((mut trail, cause)) = first_failure else {
            return Ok(Verdict::Valid);
        };
        let extra = value.own_key_count().saturating_sub(present);
        let score = valid as f64 / (shape.properties.len() + extra) as f64;
        trail.push(entry(value, display, cause, context, Some(score)));
        Ok(Verdict::Invalid(trail))
    }

    fn check_array<'a>(
        &'a self,
        display: TypeRef<'a>,
        item_type: &'a TypeData,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        let Some(items) = value.as_array() else {
            return Ok(Verdict::fail(
                value,
                display,
                Some(Cause::NotAnArray),
                context,
            ));
        };
        for (index, item) in items.iter().enumerate() {
            if let Verdict::Invalid(mut trail) =
                self.check_type(item_type, item, Some(Context::ArrayItem(index)))?
            {
                trail.push(entry(value, display, None, context, None));
                return Ok(Verdict::Invalid(trail));
            }
        }
        Ok(Verdict::Valid)
    }

    fn check_tuple<'a>(
        &'a self,
        display: TypeRef<'a>,
        item_types: &'a [TypeData],
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        let Some(items) = value.as_array() else {
            return Ok(Verdict::fail(
                value,
                display,
                Some(Cause::NotAnArray),
                context,
            ));
        };
        if items.len() != item_types.len() {
            let cause = Cause::TupleLength {
                expected: item_types.len(),
                actual: items.len(),
            };
            return Ok(Verdict::fail(value, display, Some(cause), context));
        }
        for (index, (item_type, item)) in item_types.iter().zip(items).enumerate() {
            if let Verdict::Invalid(mut trail) =
                self.check_type(item_type, item, Some(Context::TupleItem(index)))?
            {
                trail.push(entry(value, display, None, context, None));
                return Ok(Verdict::Invalid(trail));
            }
        }
        Ok(Verdict::Valid)
    }

    // =========================================================================
    // Composites
    // =========================================================================

    /// First conforming member wins. Otherwise the best-scored member failure
    /// is reported (earliest on ties); if no member was scored, the failure
    /// just lists the members.
    fn check_union<'a>(
        &'a self,
        display: TypeRef<'a>,
        members: &'a [TypeData],
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        let mut best: Option<(f64, UnmatchTrail<'a>)> = None;
        for member in members {
            let Verdict::Invalid(trail) = self.check_type(member, value, None)? else {
                return Ok(Verdict::Valid);
            };
            if let Some(score) = trail.score() {
                if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
                    best = Some((score, trail));
                }
            }
        }

        Ok(match best {
            Some((_, mut trail)) => {
                trail.push(entry(value, display, None, context, None));
                Verdict::Invalid(trail)
            }
            None => Verdict::fail(
                value,
                display,
                Some(Cause::NoMatchingType(members)),
                context,
            ),
        })
    }

    /// Every member must conform. The first failing member is reported,
    /// scored with the average over the failing members only (an unscored
    /// failure counts as 0).
    // TODO: report the best-scored failing member rather than the first.
    fn check_intersection<'a>(
        &'a self,
        display: TypeRef<'a>,
        members: &'a [TypeData],
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        let mut first_failure: Option<UnmatchTrail<'a>> = None;
        let mut failed = 0usize;
        let mut score_sum = 0.0;
        for member in members {
            if let Verdict::Invalid(trail) = self.check_type(member, value, None)? {
                failed += 1;
                score_sum += trail.score().unwrap_or(0.0);
                first_failure.get_or_insert(trail);
            }
        }

        let Some(mut trail) = first_failure else {
            return Ok(Verdict::Valid);
        };
        let score = score_sum / failed as f64;
        trail.push(entry(value, display, None, context, Some(score)));
        Ok(Verdict::Invalid(trail))
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub(crate) fn entry<'a>(
    value: &'a Value,
    ty: TypeRef<'a>,
    cause: Option<Cause<'a>>,
    context: Option<Context>,
    score: Option<f64>,
) -> UnmatchEntry<'a> {
    UnmatchEntry {
        value,
        ty,
        cause,
        context,
        score,
    }
}

/// Whether an own property key is acceptable for an index signature.
pub(crate) fn key_matches_kind(key: &str, kind: IndexKeyKind) -> bool {
    match kind {
        IndexKeyKind::String => true,
        IndexKeyKind::Number => coerce_to_number(key).is_some_and(|n| !n.is_nan()),
    }
}

fn literal_matches(literal: &LiteralValue, value: &Value) -> bool {
    match (literal, value) {
        (LiteralValue::String(expected), Value::String(actual)) => expected == actual,
        (LiteralValue::Number(expected), Value::Number(actual)) => expected == actual,
        (LiteralValue::BigInt(expected), Value::BigInt(actual)) => expected == actual,
        (LiteralValue::Boolean(expected), Value::Boolean(actual)) => expected == actual,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/checker_tests.rs"]
mod tests;
