//! Active condition set for a resolution.

use crate::config::ResolveOptions;
use std::collections::BTreeSet;
use std::fmt;

/// Always active; the catch-all every package may rely on.
pub const DEFAULT_CONDITION: &str = "default";

/// Set of condition names active for one resolution.
///
/// Membership is all that matters; the order that decides between branches
/// is the declaration order of the conditions object being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionSet {
    names: BTreeSet<String>,
}

impl ConditionSet {
    /// Assemble the set from options plus per-call overrides.
    ///
    /// Always contains `default`, one of `require`/`import` and one of
    /// `production`/`development`. Overrides only add names.
    #[must_use]
    pub fn build<S: AsRef<str>>(options: &ResolveOptions, overrides: &[S]) -> Self {
        let mut names = BTreeSet::new();
        names.insert(DEFAULT_CONDITION.to_string());
        names.insert(if options.is_require { "require" } else { "import" }.to_string());
        names.insert(
            if options.is_production {
                "production"
            } else {
                "development"
            }
            .to_string(),
        );
        names.extend(options.conditions.iter().cloned());
        names.extend(overrides.iter().map(|s| s.as_ref().to_string()));
        Self { names }
    }

    /// A set holding exactly `default` plus the given names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        set.insert(DEFAULT_CONDITION.to_string());
        Self { names: set }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ConditionSet {
    fn default() -> Self {
        Self::build(&ResolveOptions::default(), &[] as &[&str])
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.names {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
