//! Separate-chaining hash table
//!
//! Each bucket is an unordered vector of `(key, value)` pairs; the bucket for
//! a key is `key mod capacity`. Removal deletes the pair outright.

use std::mem;

use tracing::{debug, trace};

use crate::config::{doubled, TableConfig};
use crate::error::Result;
use crate::stats::TableStats;
use crate::{reduce, KeyValueTable};

type Bucket = Vec<(i64, String)>;

/// Integer-keyed table resolving collisions with per-bucket chains
#[derive(Debug, Clone)]
pub struct ChainingTable {
    buckets: Vec<Bucket>,
    len: usize,
    rehash_count: usize,
    config: TableConfig,
}

impl Default for ChainingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainingTable {
    /// Create a table with 8 buckets and a 0.9 load-factor threshold
    pub fn new() -> Self {
        let config = TableConfig::default();
        Self {
            buckets: vec![Vec::new(); config.initial_capacity],
            len: 0,
            rehash_count: 0,
            config,
        }
    }

    /// Create a table from an explicit configuration
    ///
    /// # Errors
    /// * `InvalidCapacity` / `InvalidLoadFactor` if the config does not validate
    /// * `Alloc` if the bucket array cannot be allocated
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buckets: empty_buckets(config.initial_capacity)?,
            len: 0,
            rehash_count: 0,
            config,
        })
    }

    /// Insert or overwrite `key`, returning the previous value if any
    ///
    /// Growth for a new key happens in one rebuild that also reserves room
    /// for the key in its bucket, so a failed insert leaves the table as it
    /// was.
    pub fn insert(&mut self, key: i64, value: impl Into<String>) -> Result<Option<String>> {
        let value = value.into();

        let idx = self.bucket_index(key);
        if let Some((_, current)) = self.buckets[idx].iter_mut().find(|(k, _)| *k == key) {
            trace!(key, bucket = idx, "chaining: updated in place");
            return Ok(Some(mem::replace(current, value)));
        }

        let target = self.config.grown(self.len + 1, self.capacity())?;
        if target > self.capacity() {
            self.rebuild(target, Some(key))?;
        }

        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        bucket.try_reserve(1)?;
        bucket.push((key, value));
        self.len += 1;
        trace!(key, bucket = idx, chain = bucket.len(), "chaining: inserted");

        Ok(None)
    }

    /// Look up `key`
    pub fn search(&self, key: i64) -> Option<&str> {
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Delete `key` from its bucket; absent keys are a no-op
    pub fn remove(&mut self, key: i64) -> Option<String> {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let Some(pos) = bucket.iter().position(|(k, _)| *k == key) else {
            trace!(key, "chaining: remove of absent key");
            return None;
        };

        let (_, value) = bucket.swap_remove(pos);
        self.len -= 1;
        trace!(key, bucket = idx, "chaining: removed");
        Some(value)
    }

    /// Double the bucket count and redistribute every entry
    ///
    /// Every new bucket is sized before any entry moves, so a failed
    /// allocation leaves the table untouched.
    pub fn rehash(&mut self) -> Result<()> {
        let new_capacity = doubled(self.capacity())?;
        self.rebuild(new_capacity, None)
    }

    /// Redistribute every entry into `new_capacity` buckets, leaving room
    /// for `incoming` in the bucket it will land in
    fn rebuild(&mut self, new_capacity: usize, incoming: Option<i64>) -> Result<()> {
        let old_capacity = self.capacity();
        let load_factor = self.load_factor();

        let mut counts: Vec<usize> = Vec::new();
        counts.try_reserve_exact(new_capacity)?;
        counts.resize(new_capacity, 0);
        for key in self.buckets.iter().flatten().map(|(key, _)| *key).chain(incoming) {
            counts[reduce(key, new_capacity)] += 1;
        }

        let mut fresh = empty_buckets(new_capacity)?;
        for (bucket, count) in fresh.iter_mut().zip(counts) {
            bucket.try_reserve_exact(count)?;
        }

        let old = mem::replace(&mut self.buckets, fresh);
        for (key, value) in old.into_iter().flatten() {
            self.buckets[reduce(key, new_capacity)].push((key, value));
        }

        self.rehash_count += (new_capacity / old_capacity).trailing_zeros() as usize;
        debug!(
            old_capacity,
            new_capacity,
            load_factor,
            moved = self.len,
            "chaining: rehashed"
        );
        Ok(())
    }

    /// Bucket that `key` maps to under the current capacity
    pub fn bucket_index(&self, key: i64) -> usize {
        reduce(key, self.capacity())
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current `len / capacity`
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of rehashes performed
    pub fn rehash_count(&self) -> usize {
        self.rehash_count
    }

    /// Configuration the table was built with
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// All entries, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .map(|(key, value)| (*key, value.as_str()))
    }

    /// Every bucket with its index
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[(i64, String)])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .map(|(idx, bucket)| (idx, bucket.as_slice()))
    }

    /// Snapshot of occupancy
    pub fn stats(&self) -> TableStats {
        TableStats {
            len: self.len,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            rehash_count: self.rehash_count,
            tombstones: 0,
            empty_buckets: self.buckets.iter().filter(|b| b.is_empty()).count(),
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

impl KeyValueTable for ChainingTable {
    fn insert(&mut self, key: i64, value: String) -> Result<Option<String>> {
        ChainingTable::insert(self, key, value)
    }

    fn search(&self, key: i64) -> Option<&str> {
        ChainingTable::search(self, key)
    }

    fn remove(&mut self, key: i64) -> Option<String> {
        ChainingTable::remove(self, key)
    }

    fn locate(&self, key: i64) -> Option<usize> {
        self.search(key).map(|_| self.bucket_index(key))
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        ChainingTable::capacity(self)
    }

    fn stats(&self) -> TableStats {
        ChainingTable::stats(self)
    }
}

fn empty_buckets(capacity: usize) -> Result<Vec<Bucket>> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, Vec::new);
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn table(capacity: usize, threshold: f64) -> ChainingTable {
        ChainingTable::with_config(TableConfig::new(capacity, threshold)).unwrap()
    }

    #[test]
    fn test_insert_and_search() {
        let mut table = ChainingTable::new();

        table.insert(10, "ten").unwrap();
        table.insert(20, "twenty").unwrap();

        assert_eq!(table.search(10), Some("ten"));
        assert_eq!(table.search(20), Some("twenty"));
        assert_eq!(table.search(30), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let mut table = ChainingTable::new();

        table.insert(4, "old").unwrap();
        let previous = table.insert(4, "new").unwrap();

        assert_eq!(previous.as_deref(), Some("old"));
        assert_eq!(table.search(4), Some("new"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_colliding_keys() {
        let mut table = table(8, 0.9);

        table.insert(3, "three").unwrap();
        table.insert(11, "eleven").unwrap();
        assert_eq!(table.bucket_index(3), table.bucket_index(11));

        assert_eq!(table.search(3), Some("three"));
        assert_eq!(table.search(11), Some("eleven"));

        assert_eq!(table.remove(3).as_deref(), Some("three"));
        assert_eq!(table.search(3), None);
        assert_eq!(table.search(11), Some("eleven"));

        assert_eq!(table.remove(11).as_deref(), Some("eleven"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_twice() {
        let mut table = ChainingTable::new();

        table.insert(1, "a").unwrap();
        table.insert(2, "b").unwrap();
        table.remove(1);
        assert_eq!(table.len(), 1);

        assert_eq!(table.remove(1), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rehash_preserves_entries() {
        let mut table = table(8, 0.9);

        for key in 0..8 {
            table.insert(key, format!("v{}", key)).unwrap();
        }

        assert_eq!(table.rehash_count(), 1);
        assert_eq!(table.capacity(), 16);
        for key in 0..8 {
            assert_eq!(table.search(key), Some(format!("v{}", key).as_str()));
        }
    }

    #[test]
    fn test_load_factor_invariant() {
        let mut table = table(3, 0.5);

        for key in 0..300 {
            table.insert(key * 7, "x").unwrap();
            assert!(table.load_factor() < 0.5);
        }
        assert_eq!(table.len(), 300);
        assert_eq!(table.iter().count(), 300);
    }

    #[test]
    fn test_growth_reserves_incoming_bucket() {
        let mut table = table(4, 0.05);

        table.insert(5, "five").unwrap();

        assert_eq!(table.capacity(), 32);
        assert_eq!(table.rehash_count(), 3);
        assert_eq!(table.search(5), Some("five"));
        assert_eq!(table.buckets[5].len(), 1);
    }

    #[test]
    fn test_failed_growth_leaves_table_untouched() {
        let mut table = table(4, f64::MIN_POSITIVE);

        assert_eq!(table.insert(1, "a"), Err(Error::CapacityOverflow));

        assert_eq!(table.capacity(), 4);
        assert_eq!(table.rehash_count(), 0);
        assert!(table.is_empty());
        assert_eq!(table.search(1), None);
    }

    #[test]
    fn test_alloc_failure_reported() {
        assert!(matches!(
            ChainingTable::with_config(TableConfig::new(usize::MAX / 8, 0.9)),
            Err(Error::Alloc(_))
        ));
    }

    #[test]
    fn test_negative_keys() {
        let mut table = ChainingTable::new();

        table.insert(-3, "neg").unwrap();
        table.insert(5, "pos").unwrap();

        // -3 mod 8 == 5 under Euclidean remainder
        assert_eq!(table.bucket_index(-3), 5);
        assert_eq!(table.search(-3), Some("neg"));
        assert_eq!(table.search(5), Some("pos"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ChainingTable::with_config(TableConfig::new(0, 0.9)),
            Err(Error::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_stats() {
        let mut table = table(8, 0.9);
        table.insert(1, "a").unwrap();
        table.insert(9, "b").unwrap();
        table.insert(2, "c").unwrap();

        let stats = table.stats();
        assert_eq!(stats.len, 3);
        assert_eq!(stats.empty_buckets, 6);
        assert_eq!(stats.longest_chain, 2);
        assert_eq!(stats.tombstones, 0);
    }
}
