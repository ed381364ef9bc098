//! Package descriptor and exports normalization.

use super::mapping::ExportMapping;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PACKAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Package`]. Clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(u64);

impl PackageId {
    fn next() -> Self {
        Self(NEXT_PACKAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A package's exports, normalized into one of its two object shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageExports {
    /// Conditions object for the root entry only (no key starts with `.`).
    Conditions(Vec<(String, ExportMapping)>),
    /// Path-pattern map (keys start with `.`), in declaration order.
    Patterns(Vec<(String, ExportMapping)>),
}

impl PackageExports {
    /// Normalize a raw `exports` value.
    ///
    /// A string, array, `null` or missing value becomes `{ ".": value }`.
    /// An object is a conditions object when its first key does not start
    /// with `.`, otherwise a path-pattern map.
    #[must_use]
    pub fn from_mapping(exports: Option<ExportMapping>) -> Self {
        match exports {
            Some(ExportMapping::Conditional(entries)) => {
                let is_conditions = entries
                    .first()
                    .is_some_and(|(key, _)| !key.starts_with('.'));
                if is_conditions {
                    Self::Conditions(entries)
                } else {
                    Self::Patterns(entries)
                }
            }
            Some(mapping) => Self::Patterns(vec![(".".to_string(), mapping)]),
            None => Self::Patterns(vec![(".".to_string(), ExportMapping::Null)]),
        }
    }
}

#[derive(Deserialize)]
struct RawPackage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    exports: Option<ExportMapping>,
}

/// An already-parsed package descriptor.
///
/// Immutable once built; its [`PackageId`] keys the compiled-pattern cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawPackage")]
pub struct Package {
    id: PackageId,
    name: Option<String>,
    exports: PackageExports,
}

impl From<RawPackage> for Package {
    fn from(raw: RawPackage) -> Self {
        Self::new(raw.name, raw.exports)
    }
}

impl Package {
    #[must_use]
    pub fn new(name: Option<String>, exports: Option<ExportMapping>) -> Self {
        Self {
            id: PackageId::next(),
            name,
            exports: PackageExports::from_mapping(exports),
        }
    }

    /// Parse a package.json document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a package.json file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    #[must_use]
    pub fn id(&self) -> PackageId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for messages; `<unnamed package>` when the descriptor has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed package>")
    }

    #[must_use]
    pub fn exports(&self) -> &PackageExports {
        &self.exports
    }
}
