//! LRU (Least Recently Used) cache
//!
//! A hash index maps each key to its node in the recency list. Both views
//! are private and every operation updates them together, so the key set of
//! the index always equals the key set of the list.

use std::collections::HashMap;

use ahash::RandomState;
use kvtable::{Error, Result};
use tracing::{debug, trace};

use crate::list::{NodeId, RecencyList};
use crate::stats::CacheStats;

/// Value reported by [`LruCache::get_or_miss`] for an absent key
pub const MISS: i64 = -1;

/// Fixed-capacity cache from integer keys to integer values
#[derive(Debug, Clone)]
pub struct LruCache {
    index: HashMap<i64, NodeId, RandomState>,
    list: RecencyList,
    capacity: usize,
    stats: CacheStats,
}

impl LruCache {
    /// Create an empty cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * `InvalidCapacity` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        Ok(Self {
            index: HashMap::with_hasher(RandomState::new()),
            list: RecencyList::new(),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Get the value for `key`, marking it most recently used
    pub fn get(&mut self, key: i64) -> Option<i64> {
        match self.index.get(&key) {
            Some(&id) => {
                self.list.move_to_front(id);
                self.stats.record_hit();
                Some(self.list.value(id))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// [`get`](Self::get), reporting an absent key as [`MISS`]
    pub fn get_or_miss(&mut self, key: i64) -> i64 {
        self.get(key).unwrap_or(MISS)
    }

    /// Insert or overwrite `key`, marking it most recently used
    ///
    /// Inserting a new key into a full cache first evicts the least recently
    /// used entry, which is returned. Storage for the new entry is reserved
    /// before anything changes, so an allocation failure leaves the cache as
    /// it was.
    pub fn set(&mut self, key: i64, value: i64) -> Result<Option<(i64, i64)>> {
        if let Some(&id) = self.index.get(&key) {
            self.list.set_value(id, value);
            self.list.move_to_front(id);
            self.stats.record_update();
            trace!(key, value, "lru: updated");
            return Ok(None);
        }

        self.index.try_reserve(1)?;
        self.list.reserve(1)?;

        let evicted = if self.list.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.list.push_front(key, value);
        self.index.insert(key, id);
        self.stats.record_insert();
        trace!(key, value, "lru: inserted");

        Ok(evicted)
    }

    /// Value for `key` without changing recency or stats
    pub fn peek(&self, key: i64) -> Option<i64> {
        self.index.get(&key).map(|&id| self.list.value(id))
    }

    /// Check if `key` is cached, without changing recency
    pub fn contains(&self, key: i64) -> bool {
        self.index.contains_key(&key)
    }

    /// Entry that the next insert into a full cache would evict
    pub fn peek_lru(&self) -> Option<(i64, i64)> {
        self.list.back()
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.index.len(), self.list.len());
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `(key, value)` pairs from most- to least-recently used
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (i64, i64)> + ExactSizeIterator + '_ {
        self.list.iter()
    }

    /// Drop every entry; stats are kept
    pub fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Zero the statistics counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn evict(&mut self) -> Option<(i64, i64)> {
        let (key, value) = self.list.pop_back()?;
        self.index.remove(&key);
        self.stats.record_eviction();
        debug!(key, value, "lru: evicted");
        Some((key, value))
    }
}
