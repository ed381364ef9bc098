//! Exports map resolver.
//!
//! Resolution is pure and synchronous. The only shared state is the
//! compiled-pattern cache owned by an [`ExportsResolver`], which may be used
//! from many threads at once.

mod cache;
mod conditions;
mod entry;
mod mapping;
mod package;
mod pattern;
pub mod specificity;
pub mod trace;

pub use cache::{CacheStats, PatternCache};
pub use conditions::{ConditionSet, DEFAULT_CONDITION};
pub use entry::{is_valid_entry, substitute};
pub use mapping::{ExportMapping, Resolution};
pub use package::{Package, PackageExports, PackageId};
pub use pattern::{compile, compile_all, CompiledPattern};
pub use trace::{ResolveTrace, TraceStep};

use crate::config::ResolveOptions;
use crate::error::Result;
use entry::EntryRequest;
use std::sync::Arc;

/// Resolves entries against packages, caching compiled patterns per package.
#[derive(Debug, Default)]
pub struct ExportsResolver {
    cache: PatternCache,
}

impl ExportsResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-pattern cache, for stats and teardown.
    #[must_use]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Resolve `entry` to its candidate paths.
    ///
    /// Returns an empty list when nothing matches, unless
    /// `options.assert_match` is set.
    pub fn resolve(
        &self,
        pkg: &Package,
        entry: &str,
        options: &ResolveOptions,
    ) -> Result<Vec<String>> {
        self.resolve_with_overrides(pkg, entry, options, &[] as &[&str])
    }

    /// Like [`resolve`](Self::resolve), with extra conditions for this call only.
    pub fn resolve_with_overrides<S: AsRef<str>>(
        &self,
        pkg: &Package,
        entry: &str,
        options: &ResolveOptions,
        overrides: &[S],
    ) -> Result<Vec<String>> {
        let conditions = ConditionSet::build(options, overrides);
        self.run(pkg, entry, &conditions, options.assert_match, &mut ResolveTrace::disabled())
    }

    /// Resolve and record every decision taken.
    ///
    /// The trace is returned even when resolution fails.
    pub fn resolve_with_trace(
        &self,
        pkg: &Package,
        entry: &str,
        options: &ResolveOptions,
    ) -> (Result<Vec<String>>, ResolveTrace) {
        let conditions = ConditionSet::build(options, &[] as &[&str]);
        let mut trace = ResolveTrace::new();
        let result = self.run(pkg, entry, &conditions, options.assert_match, &mut trace);
        (result, trace)
    }

    /// Resolve several entries, concatenating their paths in entry order.
    ///
    /// Duplicate paths keep their first position. In strict mode the call
    /// fails only when no entry produced a path; the first entry's failure is
    /// reported.
    pub fn resolve_entries<S: AsRef<str>>(
        &self,
        pkg: &Package,
        entries: &[S],
        options: &ResolveOptions,
    ) -> Result<Vec<String>> {
        let conditions = ConditionSet::build(options, &[] as &[&str]);
        let mut paths: Vec<String> = Vec::new();
        let mut first_failure = None;

        for entry in entries {
            match self.run(
                pkg,
                entry.as_ref(),
                &conditions,
                options.assert_match,
                &mut ResolveTrace::disabled(),
            ) {
                Ok(found) => {
                    for path in found {
                        if !paths.contains(&path) {
                            paths.push(path);
                        }
                    }
                }
                Err(err) if err.is_match_failure() => {
                    first_failure.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }

        match first_failure {
            Some(err) if paths.is_empty() => Err(err),
            _ => Ok(paths),
        }
    }

    fn run(
        &self,
        pkg: &Package,
        entry: &str,
        conditions: &ConditionSet,
        assert_match: bool,
        trace: &mut ResolveTrace,
    ) -> Result<Vec<String>> {
        let request = EntryRequest {
            pkg,
            entry,
            conditions,
            assert_match,
        };
        request.resolve(|| self.cache.get_or_compile(pkg), trace)
    }
}

/// One-shot resolution without caching compiled patterns.
pub fn resolve(pkg: &Package, entry: &str, options: &ResolveOptions) -> Result<Vec<String>> {
    let conditions = ConditionSet::build(options, &[] as &[&str]);
    let request = EntryRequest {
        pkg,
        entry,
        conditions: &conditions,
        assert_match: options.assert_match,
    };
    request.resolve(
        || match pkg.exports() {
            PackageExports::Patterns(entries) => Ok(Arc::from(compile_all(entries)?)),
            PackageExports::Conditions(_) => Ok(Arc::from(Vec::new())),
        },
        &mut ResolveTrace::disabled(),
    )
}
