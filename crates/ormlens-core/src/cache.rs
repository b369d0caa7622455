//! Resolution cache.
//!
//! Memoizes the two schema scans the unique classifier performs: qualified
//! table name to table, and (table, index name) to the index plus the domain
//! properties it covers. Negative results are cached too. Entries are
//! write-once and never evicted; the schema is static for the cache's lifetime.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ormlens_catalog::{IndexDescriptor, PropertyDescriptor, TableDescriptor, TableName};
use tracing::trace;

/// A unique index matched by name, with the domain properties it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResolution {
    /// The matched index.
    pub index: Arc<IndexDescriptor>,
    /// Properties whose columns the index covers. `None` when no field with a
    /// domain property is covered; never an empty list.
    pub properties: Option<Vec<PropertyDescriptor>>,
}

/// Cached stage-1 value.
pub type TableEntry = Option<Arc<TableDescriptor>>;

/// Cached stage-2 value.
pub type IndexEntry = Option<Arc<IndexResolution>>;

/// Cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    races: AtomicU64,
}

impl CacheStats {
    /// Get hit count.
    pub fn hits(&self) -> u64 {
        self.hits.load(AtomicOrdering::Relaxed)
    }

    /// Get miss count (each miss ran the computation once).
    pub fn misses(&self) -> u64 {
        self.misses.load(AtomicOrdering::Relaxed)
    }

    /// Computations whose result was discarded because another caller stored first.
    pub fn races(&self) -> u64 {
        self.races.load(AtomicOrdering::Relaxed)
    }

    /// Calculate hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Write-once, concurrent memo of schema lookups.
///
/// Lookups of a missing key run the computation without holding any lock, so
/// concurrent callers may compute the same key more than once. The first
/// result stored is kept and every caller returns that stored value.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    tables: DashMap<String, TableEntry>,
    indexes: DashMap<(TableName, String), IndexEntry>,
    stats: CacheStats,
}

impl ResolutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage 1: table by the literal identifier the engine quoted.
    pub fn table(&self, name: &str, compute: impl FnOnce() -> TableEntry) -> TableEntry {
        get_or_compute(&self.tables, name.to_string(), compute, &self.stats)
    }

    /// Stage 2: index of `table` named `index_name`.
    pub fn index(
        &self,
        table: &TableDescriptor,
        index_name: &str,
        compute: impl FnOnce() -> IndexEntry,
    ) -> IndexEntry {
        let key = (table.name.clone(), index_name.to_string());
        get_or_compute(&self.indexes, key, compute, &self.stats)
    }

    /// Number of cached table lookups (positive and negative).
    pub fn table_len(&self) -> usize {
        self.tables.len()
    }

    /// Number of cached index lookups (positive and negative).
    pub fn index_len(&self) -> usize {
        self.indexes.len()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

fn get_or_compute<K, V>(
    map: &DashMap<K, V>,
    key: K,
    compute: impl FnOnce() -> V,
    stats: &CacheStats,
) -> V
where
    K: Eq + Hash + std::fmt::Debug,
    V: Clone,
{
    if let Some(hit) = map.get(&key) {
        stats.hits.fetch_add(1, AtomicOrdering::Relaxed);
        trace!(key = ?hit.key(), "Resolution cache hit");
        return hit.value().clone();
    }

    stats.misses.fetch_add(1, AtomicOrdering::Relaxed);
    // No shard lock is held while the schema is scanned.
    let computed = compute();

    match map.entry(key) {
        Entry::Occupied(existing) => {
            stats.races.fetch_add(1, AtomicOrdering::Relaxed);
            trace!(key = ?existing.key(), "Resolution cache lost compute race");
            existing.get().clone()
        }
        Entry::Vacant(slot) => {
            trace!(key = ?slot.key(), "Resolution cache stored");
            slot.insert(computed).value().clone()
        }
    }
}
