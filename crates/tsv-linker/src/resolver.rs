//! Module specifier resolution.
//!
//! Relative specifiers are normalized against the importing module. Anything
//! else names an external package and is handed to a [`PackageResolver`],
//! which maps it to a concrete relative path; the default resolver knows no
//! packages.

use crate::error::LinkError;
use rustc_hash::FxHashMap;
use tsv_common::{ModulePathError, normalize_module_path};

pub trait PackageResolver: Send + Sync {
    /// Resolve a non-relative `specifier` imported by `importer` (`None` for
    /// entry paths) to a relative module path.
    fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<String>;
}

impl<F> PackageResolver for F
where
    F: Fn(&str, Option<&str>) -> Option<String> + Send + Sync,
{
    fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<String> {
        self(specifier, importer)
    }
}

/// Resolves no package at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPackages;

impl PackageResolver for NoPackages {
    fn resolve(&self, _specifier: &str, _importer: Option<&str>) -> Option<String> {
        None
    }
}

/// A fixed package name → module path table.
#[derive(Clone, Debug, Default)]
pub struct PackageMap {
    packages: FxHashMap<String, String>,
}

impl PackageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, package: impl Into<String>, path: impl Into<String>) -> Self {
        self.packages.insert(package.into(), path.into());
        self
    }
}

impl PackageResolver for PackageMap {
    fn resolve(&self, specifier: &str, _importer: Option<&str>) -> Option<String> {
        self.packages.get(specifier).cloned()
    }
}

/// Canonical path of `specifier` as imported by `importer`.
pub(crate) fn canonicalize(
    resolver: &dyn PackageResolver,
    specifier: &str,
    importer: Option<&str>,
) -> Result<String, LinkError> {
    let invalid = || LinkError::InvalidSpecifier {
        specifier: specifier.to_string(),
        importer: importer.map(str::to_string),
    };
    match normalize_module_path(specifier, importer) {
        Ok(path) => Ok(path),
        Err(ModulePathError::Empty) => Err(invalid()),
        Err(ModulePathError::NotRelative(_)) => {
            let resolved = resolver.resolve(specifier, importer).ok_or_else(|| {
                LinkError::UnresolvedPackage {
                    specifier: specifier.to_string(),
                    importer: importer.map(str::to_string),
                }
            })?;
            normalize_module_path(&resolved, None).map_err(|_| invalid())
        }
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
