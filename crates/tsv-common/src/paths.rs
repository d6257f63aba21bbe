//! Canonical module paths.
//!
//! Every module is keyed by a canonical relative path:
//! - recognized source extensions are stripped (`./a.ts` → `./a`)
//! - `.` and `..` segments are collapsed against the importing module's
//!   directory (entry paths are resolved against the root)
//! - the result always starts with `./` or `../`
//!
//! Specifiers that do not start with `.`/`..` name external packages and are
//! rejected here; callers hand them to a package resolver instead.

use thiserror::Error;

/// Source extensions stripped from module paths, compound extensions first.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    ".d.ts", ".d.mts", ".d.cts", ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModulePathError {
    #[error("module specifier '{0}' is not relative")]
    NotRelative(String),
    #[error("empty module specifier")]
    Empty,
}

/// Whether `specifier` is relative (`.`, `..`, `./…`, `../…`).
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Strip the first matching entry of [`SOURCE_EXTENSIONS`].
pub fn strip_source_extension(path: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
        .unwrap_or(path)
}

/// Directory of a canonical module path (`./a/b` → `./a`, `./b` → `.`).
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => ".",
    }
}

/// Normalize `specifier` to its canonical form.
///
/// `importer` is the canonical path of the importing module, or `None` for
/// entry paths.
pub fn normalize_module_path(
    specifier: &str,
    importer: Option<&str>,
) -> Result<String, ModulePathError> {
    if specifier.is_empty() {
        return Err(ModulePathError::Empty);
    }
    if !is_relative_specifier(specifier) {
        return Err(ModulePathError::NotRelative(specifier.to_string()));
    }

    let base = importer.map_or(".", parent_dir);
    let stripped = strip_source_extension(specifier);

    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(stripped.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    Ok(match segments.first() {
        None => ".".to_string(),
        Some(&"..") => segments.join("/"),
        Some(_) => format!("./{}", segments.join("/")),
    })
}

#[cfg(test)]
#[path = "../tests/paths_tests.rs"]
mod tests;
