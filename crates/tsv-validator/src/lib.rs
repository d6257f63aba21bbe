//! Structural validator for the tsv type graph.
//!
//! Checks runtime [`Value`](tsv_common::Value)s against the named types of a
//! linked [`TypeGraph`](tsv_graph::TypeGraph):
//!
//! ```ignore
//! let validator = Validator::new(&graph);
//! let result = validator.check("./models", "User", &value)?;
//! if !result.conform {
//!     eprintln!("{}", result.error.unwrap_or_default());
//! }
//! ```
//!
//! A mismatch is an ordinary result carrying a rendered diagnostic; a
//! [`CheckError`] means the query itself is invalid (unknown or unexported
//! type, or a construct such as generics that the validator does not model).

mod checker;
mod diagnostics;
mod error;
mod format;
mod options;
mod projection;

pub use checker::{CheckResult, Validator};
pub use diagnostics::{Cause, Context, TypeRef, UnmatchEntry, UnmatchTrail, Verdict};
pub use error::CheckError;
pub use format::{format_trail, render_type, render_value};
pub use options::ValidatorOptions;
