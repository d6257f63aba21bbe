//! Checking errors.
//!
//! A `CheckError` means the query itself cannot be answered: the type does not
//! exist, is not exported, or reaches a construct the validator does not
//! handle. A value that merely fails to conform is never an error; see
//! [`Verdict`](crate::Verdict).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("unknown module '{path}'")]
    UnknownModule { path: String },

    #[error("module '{module}' has no type named '{name}'")]
    UnknownType { module: String, name: String },

    #[error("type '{name}' of module '{module}' is not exported")]
    NotExported { module: String, name: String },

    #[error("type '{name}' was declared but never defined")]
    UndefinedBody { name: String },

    #[error("{feature} is not supported by the validator")]
    Unimplemented { feature: &'static str },

    #[error("keyof is not supported on {kind} types")]
    UnsupportedKeyof { kind: &'static str },

    #[error("member access is not supported on {kind} types")]
    UnsupportedMember { kind: &'static str },

    #[error("member access on unknown property '{property}'")]
    UnknownProperty { property: String },

    #[error("tuple index {index} is out of range for a tuple of {len} items")]
    TupleIndexOutOfRange { index: String, len: usize },
}
