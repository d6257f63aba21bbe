//! Common types and utilities for the tsv structural validator.
//!
//! This crate provides foundational types used across all tsv crates:
//! - Runtime values checked by the validator (`Value`, `ObjectValue`, `FunctionValue`)
//! - Canonical module path handling (`normalize_module_path`, `ModulePathError`)

// Runtime value model
pub mod value;
pub use value::{FunctionValue, ObjectValue, TypeofTag, Value, coerce_to_number, number_to_string};

// Canonical module paths
pub mod paths;
pub use paths::{
    ModulePathError, SOURCE_EXTENSIONS, is_relative_specifier, normalize_module_path, parent_dir,
    strip_source_extension,
};
