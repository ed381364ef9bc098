use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving an exports map.
///
/// `InvalidPathPattern` and `InvalidCondition` describe a malformed descriptor
/// and are always returned. `MissingExport` and `NoMatchingCondition` are only
/// returned when strict matching is requested.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid path pattern '{pattern}': exports keys must start with '.'")]
    InvalidPathPattern { pattern: String },

    #[error("invalid condition '{condition}': path patterns cannot be nested inside conditions")]
    InvalidCondition { condition: String },

    #[error("entry '{entry}' is not exported by {package}")]
    MissingExport { entry: String, package: String },

    #[error("no condition matched for entry '{entry}' of {package} (active: {conditions})")]
    NoMatchingCondition {
        entry: String,
        package: String,
        conditions: String,
    },

    #[error("failed to parse package descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error comes from strict matching rather than a malformed descriptor.
    #[must_use]
    pub fn is_match_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingExport { .. } | Self::NoMatchingCondition { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
