//! Structured mismatch diagnostics.
//!
//! ## Lazy rendering
//!
//! A failed check produces an [`UnmatchTrail`]: borrowed values and types
//! plus small [`Cause`]/[`Context`] descriptors. Nothing is formatted while
//! checking. Union members are tried speculatively and most of their
//! failures are discarded, so strings are only built by
//! [`format_trail`](crate::format_trail) once a trail is actually reported.
//!
//! ## Trail order
//!
//! Entries are pushed innermost-first as the recursion unwinds: the first
//! entry is the deepest mismatch, the last one describes the checked value
//! as a whole. The formatter reverses this so the outer context reads first.

use smallvec::SmallVec;
use std::fmt;
use tsv_common::Value;
use tsv_graph::{IndexKeyKind, NamedTypeId, TypeData};

/// The type an entry failed against: a named type (rendered by name) or an
/// anonymous type expression (rendered structurally).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TypeRef<'a> {
    Named(NamedTypeId),
    Node(&'a TypeData),
}

/// Where a nested value sits inside the value one level up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Context {
    Property(String),
    ArrayItem(usize),
    TupleItem(usize),
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Property(name) => write!(f, "property '{name}'"),
            Context::ArrayItem(index) => write!(f, "array item {index}"),
            Context::TupleItem(index) => write!(f, "tuple item {index}"),
        }
    }
}

/// Why a value failed, beyond "it does not conform".
#[derive(Clone, Debug, PartialEq)]
pub enum Cause<'a> {
    /// Global type whose constructor is not on the value's prototype chain.
    NotInstanceOf(&'a str),
    NotAnObject,
    NotAnArray,
    NotAFunction,
    MissingProperty(&'a str),
    /// Own key rejected by an index signature's key kind.
    InvalidIndexKey { key: String, kind: IndexKeyKind },
    TupleLength { expected: usize, actual: usize },
    /// Union where no member produced a scored failure.
    NoMatchingType(&'a [TypeData]),
    InvalidKey,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnmatchEntry<'a> {
    pub value: &'a Value,
    pub ty: TypeRef<'a>,
    pub cause: Option<Cause<'a>>,
    pub context: Option<Context>,
    /// Partial-match score in `0.0..=1.0`, set by interface and intersection
    /// failures only. Used to rank union alternatives, never to decide
    /// conformance.
    pub score: Option<f64>,
}

/// Mismatch entries, innermost first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnmatchTrail<'a> {
    entries: SmallVec<[UnmatchEntry<'a>; 4]>,
}

impl<'a> UnmatchTrail<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: UnmatchEntry<'a>) {
        self.entries.push(entry);
    }

    /// Innermost first.
    pub fn entries(&self) -> &[UnmatchEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry describing the checked value as a whole.
    pub fn outermost(&self) -> Option<&UnmatchEntry<'a>> {
        self.entries.last()
    }

    /// Score of the failure as a whole.
    pub fn score(&self) -> Option<f64> {
        self.outermost().and_then(|entry| entry.score)
    }
}

/// Outcome of checking one value against one type.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict<'a> {
    Valid,
    Invalid(UnmatchTrail<'a>),
}

impl<'a> Verdict<'a> {
    /// A failure consisting of a single entry.
    pub(crate) fn fail(
        value: &'a Value,
        ty: TypeRef<'a>,
        cause: Option<Cause<'a>>,
        context: Option<Context>,
    ) -> Self {
        let mut trail = UnmatchTrail::new();
        trail.push(UnmatchEntry {
            value,
            ty,
            cause,
            context,
            score: None,
        });
        Verdict::Invalid(trail)
    }

    pub fn trail(&self) -> Option<&UnmatchTrail<'a>> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(trail) => Some(trail),
        }
    }
}
