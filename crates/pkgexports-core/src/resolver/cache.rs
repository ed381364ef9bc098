//! Compiled-pattern side table.
//!
//! Maps a package's identity to its compiled path patterns. Entries live
//! until [`PatternCache::forget`] or [`PatternCache::clear`] is called; a
//! package is assumed immutable while cached.

use super::package::{Package, PackageExports, PackageId};
use super::pattern::{compile_all, CompiledPattern};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Packages with compiled patterns.
    pub entries: usize,
    /// Lookups served from the cache.
    pub hits: usize,
    /// Lookups that compiled patterns.
    pub misses: usize,
}

/// Thread-safe cache of compiled patterns per package.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<PackageId, Arc<[CompiledPattern]>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled patterns for `pkg`, compiling on first use.
    ///
    /// Two threads missing at once both compile; the first to publish wins
    /// and the other's result is dropped. A conditions-only package has no
    /// patterns and is not cached.
    pub fn get_or_compile(&self, pkg: &Package) -> Result<Arc<[CompiledPattern]>> {
        let PackageExports::Patterns(entries) = pkg.exports() else {
            return Ok(Arc::from(Vec::new()));
        };

        {
            let cached = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(patterns) = cached.get(&pkg.id()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(patterns));
            }
        }

        let compiled: Arc<[CompiledPattern]> = Arc::from(compile_all(entries)?);
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(
            package = pkg.display_name(),
            patterns = compiled.len(),
            "compiled exports patterns"
        );

        let mut cached = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cached.entry(pkg.id()).or_insert(compiled)))
    }

    /// Drop the entry for `pkg`. Returns whether one existed.
    pub fn forget(&self, pkg: &Package) -> bool {
        let mut cached = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        cached.remove(&pkg.id()).is_some()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        let mut cached = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        cached.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let cached = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            entries: cached.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
