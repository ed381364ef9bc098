//! Compilation of exports keys into matchers.
//!
//! Every `*` in a key becomes a lazy capture group; everything else is
//! matched literally. A key ending in `/` is shorthand for the same key
//! followed by `*`.

use super::mapping::ExportMapping;
use crate::error::{Error, Result};
use regex_lite::Regex;
use tracing::trace;

/// An exports key compiled to a matcher, paired with its mapping.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    key: String,
    normalized: String,
    matcher: Regex,
    mapping: ExportMapping,
    trailing_slash: bool,
}

impl CompiledPattern {
    /// The key as declared.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key with trailing-slash shorthand expanded (`"./foo/"` is `"./foo/*"`).
    #[must_use]
    pub fn normalized_key(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn mapping(&self) -> &ExportMapping {
        &self.mapping
    }

    /// Whether the key used the trailing-slash shorthand.
    #[must_use]
    pub fn trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Number of wildcard slots.
    #[must_use]
    pub fn wildcards(&self) -> usize {
        self.matcher.captures_len() - 1
    }

    /// A pattern without wildcards only matches its own key.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.wildcards() == 0
    }

    /// Match `entry` against this pattern, returning the captured slots in order.
    #[must_use]
    pub fn captures(&self, entry: &str) -> Option<Vec<String>> {
        let caps = self.matcher.captures(entry)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

/// Compile a single exports key.
pub fn compile(key: &str, mapping: &ExportMapping) -> Result<CompiledPattern> {
    if !key.starts_with('.') {
        return Err(Error::InvalidPathPattern {
            pattern: key.to_string(),
        });
    }

    let trailing_slash = key.ends_with('/');
    let normalized = if trailing_slash {
        format!("{key}*")
    } else {
        key.to_string()
    };

    let mut source = String::from("(?s)^");
    for (i, literal) in normalized.split('*').enumerate() {
        if i > 0 {
            source.push_str("(.*?)");
        }
        source.push_str(&regex_lite::escape(literal));
    }
    source.push('$');

    let matcher = Regex::new(&source).map_err(|_| Error::InvalidPathPattern {
        pattern: key.to_string(),
    })?;
    trace!(key, regex = %source, "compiled exports pattern");

    Ok(CompiledPattern {
        key: key.to_string(),
        normalized,
        matcher,
        mapping: mapping.clone(),
        trailing_slash,
    })
}

/// Compile every key of a path-pattern map, keeping declaration order.
pub fn compile_all(entries: &[(String, ExportMapping)]) -> Result<Vec<CompiledPattern>> {
    entries
        .iter()
        .map(|(key, mapping)| compile(key, mapping))
        .collect()
}
