//! Cached geodesic extents, keyed by entity and geometry digest.
//!
//! Zoom heuristics ask for an incident's extent on every camera move,
//! but geometries only change when the feed does. The cache recomputes
//! an extent only when the coordinate digest changes, and the manager
//! evicts entries for entities that left the feed.

use std::collections::{BTreeMap, BTreeSet};

use emergency_map_geometry::Geometry;

use crate::EntityId;

#[derive(Debug)]
struct CacheEntry {
    hash: md5::Digest,
    extent_m: f64,
}

/// Lifetime hit and miss counters for an [`ExtentCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that recomputed the extent.
    pub misses: u64,
}

/// Memoizes [`Geometry::extent_meters`] per entity.
#[derive(Debug, Default)]
pub struct ExtentCache {
    entries: BTreeMap<EntityId, CacheEntry>,
    stats: CacheStats,
}

impl ExtentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the extent in meters for `entity_id`'s geometry,
    /// computing and caching it when the coordinates changed since the
    /// last lookup. `None` geometry reads as zero and touches nothing.
    pub fn get(&mut self, entity_id: &str, geometry: Option<&Geometry>) -> f64 {
        let Some(geometry) = geometry else {
            return 0.0;
        };

        let hash = geometry.coordinate_hash();
        if let Some(entry) = self.entries.get(entity_id)
            && entry.hash == hash
        {
            self.stats.hits += 1;
            log::debug!("Extent cache hit for {entity_id}");
            return entry.extent_m;
        }

        let reason = if self.entries.contains_key(entity_id) {
            "geometry changed"
        } else {
            "new entry"
        };
        let extent_m = geometry.extent_meters();
        self.entries
            .insert(entity_id.to_string(), CacheEntry { hash, extent_m });
        self.stats.misses += 1;
        log::debug!("Extent cache miss for {entity_id} ({reason}), extent {extent_m:.0}m");
        extent_m
    }

    /// Drops the entry for `entity_id`, if any.
    pub fn remove(&mut self, entity_id: &str) {
        self.entries.remove(entity_id);
    }

    /// Evicts entries whose entity is no longer in `active_ids` and
    /// returns how many were removed.
    pub fn cleanup(&mut self, active_ids: &BTreeSet<EntityId>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entity_id, _| active_ids.contains(entity_id));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Evicted {removed} stale extent cache entries");
        }
        removed
    }

    /// Drops every entry. Counters survive; they describe the lifetime
    /// of the cache, not its contents.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
