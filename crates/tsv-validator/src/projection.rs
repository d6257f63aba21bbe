//! `keyof T` and `T[key]` checks.
//!
//! Both project through the parent type rather than building a new type:
//!
//! - `keyof T` accepts a value if it is a valid property key of `T`.
//! - `T[key]` looks up the type at `key` in `T` and checks the value
//!   against it. Only literal string and number keys are supported.
//!
//! Parents that cannot be projected (unions, primitives, ...) are query
//! errors, not mismatches: they mean the graph asks for something the
//! validator does not model.

use crate::checker::{Outcome, Validator, entry, key_matches_kind};
use crate::diagnostics::{Cause, Context, TypeRef, UnmatchTrail, Verdict};
use crate::error::CheckError;
use std::borrow::Cow;
use tsv_common::{Value, number_to_string};
use tsv_graph::{CompositeOp, LiteralValue, MemberKey, TypeData};

/// A literal member key.
#[derive(Clone, Copy, Debug)]
enum ProjectionKey<'a> {
    Name(&'a str),
    Index(f64),
}

impl<'a> ProjectionKey<'a> {
    fn from_member_key(key: &'a MemberKey) -> Result<Self, CheckError> {
        match key {
            MemberKey::Literal {
                value: LiteralValue::String(name),
            } => Ok(ProjectionKey::Name(name)),
            MemberKey::Literal {
                value: LiteralValue::Number(index),
            } => Ok(ProjectionKey::Index(*index)),
            MemberKey::Literal { .. } => Err(CheckError::Unimplemented {
                feature: "non-string, non-number member keys",
            }),
            MemberKey::Name { .. } => Err(CheckError::Unimplemented {
                feature: "symbolic member keys",
            }),
        }
    }

    fn property_name(self) -> Cow<'a, str> {
        match self {
            ProjectionKey::Name(name) => Cow::Borrowed(name),
            ProjectionKey::Index(index) => Cow::Owned(number_to_string(index)),
        }
    }
}

impl<'g> Validator<'g> {
    // =========================================================================
    // keyof
    // =========================================================================

    pub(crate) fn check_keyof<'a>(
        &'a self,
        display: TypeRef<'a>,
        of: &'a TypeData,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        Ok(if self.is_key_of(of, value)? {
            Verdict::Valid
        } else {
            Verdict::fail(value, display, Some(Cause::InvalidKey), context)
        })
    }

    fn is_key_of(&self, of: &TypeData, value: &Value) -> Result<bool, CheckError> {
        match of {
            TypeData::Interface(shape) => {
                if shape.mapped_index_signature.is_some() {
                    return Err(CheckError::Unimplemented {
                        feature: "keyof on mapped index signatures",
                    });
                }
                let Some(key) = value.as_property_key() else {
                    return Ok(false);
                };
                let by_index = shape
                    .index_signature
                    .as_ref()
                    .is_some_and(|signature| key_matches_kind(&key, signature.key_kind));
                Ok(by_index || shape.property(&key).is_some())
            }
            TypeData::Array(_)
            | TypeData::Tuple(_)
            | TypeData::Literal(LiteralValue::String(_)) => Ok(value.is_numeric_key()),
            TypeData::LocalRef { target, .. } | TypeData::ImportedRef { target, .. } => {
                self.is_key_of(self.body_of(*target)?, value)
            }
            TypeData::Composite {
                op: CompositeOp::Intersection,
                members,
            } => {
                for member in members {
                    if self.is_key_of(member, value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            other => Err(CheckError::UnsupportedKeyof {
                kind: other.kind_name(),
            }),
        }
    }

    // =========================================================================
    // Member access
    // =========================================================================

    pub(crate) fn check_member<'a>(
        &'a self,
        display: TypeRef<'a>,
        of: &'a TypeData,
        key: &'a MemberKey,
        value: &'a Value,
        context: Option<Context>,
    ) -> Outcome<'a> {
        let key = ProjectionKey::from_member_key(key)?;
        Ok(match self.check_projection(of, key, value)? {
            Verdict::Valid => Verdict::Valid,
            Verdict::Invalid(mut trail) => {
                trail.push(entry(value, display, None, context, None));
                Verdict::Invalid(trail)
            }
        })
    }

    fn check_projection<'a>(
        &'a self,
        of: &'a TypeData,
        key: ProjectionKey<'_>,
        value: &'a Value,
    ) -> Outcome<'a> {
        match (of, key) {
            (TypeData::Interface(shape), key) => {
                let name = key.property_name();
                let property =
                    shape
                        .property(&name)
                        .ok_or_else(|| CheckError::UnknownProperty {
                            property: name.into_owned(),
                        })?;
                self.check_type(&property.ty, value, None)
            }
            (TypeData::Array(item), ProjectionKey::Index(_)) => self.check_type(item, value, None),
            (TypeData::Tuple(items), ProjectionKey::Index(index)) => {
                let position = (index >= 0.0 && index.fract() == 0.0)
                    .then_some(index as usize)
                    .filter(|&position| position < items.len())
                    .ok_or_else(|| CheckError::TupleIndexOutOfRange {
                        index: number_to_string(index),
                        len: items.len(),
                    })?;
                self.check_type(&items[position], value, None)
            }
            (TypeData::Array(_) | TypeData::Tuple(_), ProjectionKey::Name(name)) => {
                Err(CheckError::UnknownProperty {
                    property: name.to_string(),
                })
            }
            (TypeData::LocalRef { target, .. } | TypeData::ImportedRef { target, .. }, key) => {
                self.check_projection(self.body_of(*target)?, key, value)
            }
            (
                TypeData::Composite {
                    op: CompositeOp::Intersection,
                    members,
                },
                key,
            ) => self.check_intersection_projection(members, key, value),
            (other, _) => Err(CheckError::UnsupportedMember {
                kind: other.kind_name(),
            }),
        }
    }

    /// `(A & B)[key]` accepts the value if any member's projection does.
    ///
    /// A member that cannot be projected at all (say `B` has no such
    /// property) only fails the query if no other member produced a verdict.
    fn check_intersection_projection<'a>(
        &'a self,
        members: &'a [TypeData],
        key: ProjectionKey<'_>,
        value: &'a Value,
    ) -> Outcome<'a> {
        let mut first_failure: Option<UnmatchTrail<'a>> = None;
        let mut first_error: Option<CheckError> = None;
        for member in members {
            match self.check_projection(member, key, value) {
                Ok(Verdict::Valid) => return Ok(Verdict::Valid),
                Ok(Verdict::Invalid(trail)) => {
                    first_failure.get_or_insert(trail);
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        match (first_failure, first_error) {
            (Some(trail), _) => Ok(Verdict::Invalid(trail)),
            (None, Some(err)) => Err(err),
            (None, None) => Err(CheckError::UnknownProperty {
                property: key.property_name().into_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/projection_tests.rs"]
mod tests;
