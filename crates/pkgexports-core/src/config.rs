use serde::{Deserialize, Serialize};

/// Caller options for a resolution.
///
/// Deserializes from the camelCase shape used by JavaScript tooling:
/// `{ "conditions": ["node"], "isProduction": true, "isRequire": false, "assertMatch": true }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Extra custom conditions (e.g. "node", "browser").
    pub conditions: Vec<String>,

    /// Selects "production" instead of "development".
    pub is_production: bool,

    /// Selects "require" instead of "import".
    pub is_require: bool,

    /// Turn match failures into errors instead of an empty result.
    pub assert_match: bool,
}

impl ResolveOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add custom conditions.
    #[must_use]
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.extend(conditions.into_iter().map(Into::into));
        self
    }

    /// Set production mode.
    #[must_use]
    pub fn with_production(mut self, is_production: bool) -> Self {
        self.is_production = is_production;
        self
    }

    /// Set require (CJS) mode.
    #[must_use]
    pub fn with_require(mut self, is_require: bool) -> Self {
        self.is_require = is_require;
        self
    }

    /// Set strict matching.
    #[must_use]
    pub fn with_assert_match(mut self, assert_match: bool) -> Self {
        self.assert_match = assert_match;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case() {
        let opts: ResolveOptions = serde_json::from_value(json!({
            "conditions": ["node"],
            "isProduction": true,
            "isRequire": true,
            "assertMatch": true
        }))
        .unwrap();
        assert_eq!(opts.conditions, vec!["node".to_string()]);
        assert!(opts.is_production);
        assert!(opts.is_require);
        assert!(opts.assert_match);
    }

    #[test]
    fn test_deserialize_defaults() {
        let opts: ResolveOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, ResolveOptions::default());
    }

    #[test]
    fn test_builder() {
        let opts = ResolveOptions::new()
            .with_conditions(["node", "browser"])
            .with_production(true)
            .with_assert_match(true);
        assert_eq!(opts.conditions.len(), 2);
        assert!(opts.is_production);
        assert!(!opts.is_require);
        assert!(opts.assert_match);
    }
}
