//! Memoization of computed samples

use cloudsampler_core::{Result, SampleKey, SampleSet};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Hit and miss counters of a [`SampleCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Map from a request key to its shared, immutable result.
///
/// An entry is computed at most once and then returned unchanged until
/// [`SampleCache::clear`] is called. Failed computations leave no entry.
#[derive(Debug)]
pub struct SampleCache<K = SampleKey, V = SampleSet> {
    entries: HashMap<K, Arc<V>>,
    stats: CacheStats,
}

impl<K: Eq + Hash, V> SampleCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Return the entry for `key`, running `compute` only if it is missing
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Ok(Arc::clone(value));
        }

        self.stats.misses += 1;
        let value = Arc::new(compute()?);
        self.entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<K: Eq + Hash, V> Default for SampleCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
