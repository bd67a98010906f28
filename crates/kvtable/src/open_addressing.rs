//! Open-addressing hash table with double hashing
//!
//! Slot layout:
//! - capacity is always a power of two
//! - probe `i` for key `k` lands on `(hash1(k) + i * hash2(k)) mod capacity`
//! - `hash2` is forced odd, so it is coprime with the capacity and the
//!   probe sequence visits every slot exactly once
//!
//! Removal leaves a [`Slot::Tombstone`] so probe chains running through the
//! slot stay intact. Tombstones are only cleared by a rehash.

use std::iter;

use tracing::{debug, trace};

use crate::config::{doubled, TableConfig};
use crate::error::{Error, Result};
use crate::stats::TableStats;
use crate::{reduce, KeyValueTable};

/// One slot of the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    /// Never held an entry since the last rehash; ends every probe
    #[default]
    Empty,
    /// Live entry
    Occupied {
        /// Entry key
        key: i64,
        /// Entry value
        value: String,
    },
    /// Held an entry that was removed; probes continue past it
    Tombstone,
}

/// Integer-keyed table resolving collisions by double hashing
#[derive(Debug, Clone)]
pub struct OpenAddressingTable {
    slots: Vec<Slot>,
    len: usize,
    tombstones: usize,
    rehash_count: usize,
    config: TableConfig,
}

impl Default for OpenAddressingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAddressingTable {
    /// Create a table with 8 slots and a 0.9 load-factor threshold
    pub fn new() -> Self {
        let config = TableConfig::default();
        Self {
            slots: vec![Slot::Empty; config.initial_capacity],
            len: 0,
            tombstones: 0,
            rehash_count: 0,
            config,
        }
    }

    /// Create a table from an explicit configuration
    ///
    /// A capacity that is not a power of two is rounded up to the next one.
    ///
    /// # Errors
    /// * `InvalidCapacity` / `InvalidLoadFactor` if the config does not validate
    /// * `Alloc` if the slot array cannot be allocated
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config
            .initial_capacity
            .checked_next_power_of_two()
            .ok_or(Error::CapacityOverflow)?;

        Ok(Self {
            slots: empty_slots(capacity)?,
            len: 0,
            tombstones: 0,
            rehash_count: 0,
            config,
        })
    }

    /// Insert or overwrite `key`
    ///
    /// Returns the previous value when the key was already present. A new key
    /// may grow the table first so that `len / capacity` stays below the
    /// threshold once the entry is in. The grown capacity is worked out before
    /// anything moves and applied in a single rebuild, so a failed insert
    /// leaves the table as it was.
    pub fn insert(&mut self, key: i64, value: impl Into<String>) -> Result<Option<String>> {
        let value = value.into();

        if let Some(idx) = self.find(key) {
            if let Slot::Occupied { value: current, .. } = &mut self.slots[idx] {
                trace!(key, idx, "open addressing: updated in place");
                return Ok(Some(std::mem::replace(current, value)));
            }
        }

        let target = self.config.grown(self.len + 1, self.capacity())?;
        if target > self.capacity() {
            self.rebuild(target)?;
        }

        // Only loops if a probe sequence misses a vacancy, which full-cycle
        // probing with len < capacity rules out
        let idx = loop {
            if let Some(idx) = self.vacancy(key) {
                break idx;
            }
            debug!(key, capacity = self.capacity(), "open addressing: probe exhausted, forcing rehash");
            self.rehash()?;
        };

        if self.slots[idx] == Slot::Tombstone {
            self.tombstones -= 1;
        }
        self.slots[idx] = Slot::Occupied { key, value };
        self.len += 1;
        trace!(key, idx, "open addressing: inserted");

        Ok(None)
    }

    /// Look up `key`
    pub fn search(&self, key: i64) -> Option<&str> {
        let idx = self.find(key)?;
        match &self.slots[idx] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Remove `key`, leaving a tombstone; absent keys are a no-op
    pub fn remove(&mut self, key: i64) -> Option<String> {
        let Some(idx) = self.find(key) else {
            trace!(key, "open addressing: remove of absent key");
            return None;
        };

        let removed = std::mem::replace(&mut self.slots[idx], Slot::Tombstone);
        self.len -= 1;
        self.tombstones += 1;
        trace!(key, idx, "open addressing: removed");

        match removed {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Double the capacity and reinsert every live entry, dropping tombstones
    ///
    /// The new slot array is allocated before anything is moved, so a failed
    /// allocation leaves the table untouched.
    pub fn rehash(&mut self) -> Result<()> {
        let new_capacity = doubled(self.capacity())?;
        self.rebuild(new_capacity)
    }

    /// Move every live entry into a fresh array of `new_capacity` slots
    ///
    /// `new_capacity` is the current capacity doubled one or more times; each
    /// doubling counts as one rehash.
    fn rebuild(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.capacity();
        let load_factor = self.load_factor();

        let old = std::mem::replace(&mut self.slots, empty_slots(new_capacity)?);
        self.tombstones = 0;

        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                // len < old capacity < new capacity and the probe covers every slot
                match self.vacancy(key) {
                    Some(idx) => self.slots[idx] = Slot::Occupied { key, value },
                    None => unreachable!("full-cycle probe missed a free slot"),
                }
            }
        }

        self.rehash_count += (new_capacity / old_capacity).trailing_zeros() as usize;
        debug!(
            old_capacity,
            new_capacity,
            load_factor,
            moved = self.len,
            "open addressing: rehashed"
        );
        Ok(())
    }

    /// Slot index currently holding `key`
    pub fn position(&self, key: i64) -> Option<usize> {
        self.find(key)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the table holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current `len / capacity`
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of tombstoned slots
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Number of rehashes performed
    pub fn rehash_count(&self) -> usize {
        self.rehash_count
    }

    /// Configuration the table was built with
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((*key, value.as_str())),
            _ => None,
        })
    }

    /// Every slot with its index, including empty and tombstoned ones
    pub fn slots(&self) -> impl Iterator<Item = (usize, &Slot)> + '_ {
        self.slots.iter().enumerate()
    }

    /// Snapshot of occupancy
    pub fn stats(&self) -> TableStats {
        let mut empty = 0;
        let mut run = 0;
        let mut longest = 0;
        for slot in &self.slots {
            if *slot == Slot::Empty {
                empty += 1;
                run = 0;
            } else {
                run += 1;
                longest = longest.max(run);
            }
        }

        TableStats {
            len: self.len,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            rehash_count: self.rehash_count,
            tombstones: self.tombstones,
            empty_buckets: empty,
            longest_chain: longest,
        }
    }

    fn hash1(&self, key: i64) -> usize {
        reduce(key, self.capacity())
    }

    fn hash2(&self, key: i64) -> usize {
        let modulus = (self.capacity() - 1).max(1);
        (1 + reduce(key, modulus)) | 1
    }

    /// Full probe sequence for `key`: `capacity` distinct slot indices
    fn probe(&self, key: i64) -> impl Iterator<Item = usize> {
        let capacity = self.capacity();
        let step = self.hash2(key);
        iter::successors(Some(self.hash1(key)), move |&idx| Some((idx + step) % capacity))
            .take(capacity)
    }

    /// Index of the live slot for `key`, skipping tombstones, stopping at the first empty slot
    fn find(&self, key: i64) -> Option<usize> {
        for idx in self.probe(key) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied { key: k, .. } if *k == key => return Some(idx),
                _ => {}
            }
        }
        None
    }

    /// First empty or tombstoned slot on the probe sequence for `key`
    fn vacancy(&self, key: i64) -> Option<usize> {
        self.probe(key)
            .find(|&idx| !matches!(self.slots[idx], Slot::Occupied { .. }))
    }
}

impl KeyValueTable for OpenAddressingTable {
    fn insert(&mut self, key: i64, value: String) -> Result<Option<String>> {
        OpenAddressingTable::insert(self, key, value)
    }

    fn search(&self, key: i64) -> Option<&str> {
        OpenAddressingTable::search(self, key)
    }

    fn remove(&mut self, key: i64) -> Option<String> {
        OpenAddressingTable::remove(self, key)
    }

    fn locate(&self, key: i64) -> Option<usize> {
        self.position(key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        OpenAddressingTable::capacity(self)
    }

    fn stats(&self) -> TableStats {
        OpenAddressingTable::stats(self)
    }
}

fn empty_slots(capacity: usize) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize(capacity, Slot::Empty);
    Ok(slots)
}
