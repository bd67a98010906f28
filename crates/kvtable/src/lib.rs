//! # kvtable
//!
//! Integer-keyed hash tables built from scratch.
//!
//! ## Variants
//! - **Open addressing**: double hashing over a power-of-two slot array,
//!   tombstone deletion
//! - **Chaining**: per-bucket vectors, true deletion
//!
//! Both grow by doubling when an insert would push `len / capacity` to the
//! configured threshold. [`ArraySet`] is the small unique-string array used
//! alongside them.

#![warn(missing_docs)]

mod array_set;
mod chaining;
mod config;
mod error;
mod open_addressing;
mod stats;

pub use array_set::{ArraySet, DEFAULT_SET_CAPACITY};
pub use chaining::ChainingTable;
pub use config::{TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::{Error, Result};
pub use open_addressing::{OpenAddressingTable, Slot};
pub use stats::TableStats;

/// Operations shared by both table variants
pub trait KeyValueTable {
    /// Insert or overwrite `key`, returning the previous value
    fn insert(&mut self, key: i64, value: String) -> Result<Option<String>>;

    /// Look up `key`
    fn search(&self, key: i64) -> Option<&str>;

    /// Remove `key`, returning its value; absent keys are a no-op
    fn remove(&mut self, key: i64) -> Option<String>;

    /// Slot or bucket index currently holding `key`
    fn locate(&self, key: i64) -> Option<usize>;

    /// Number of live entries
    fn len(&self) -> usize;

    /// Check if the table holds no live entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots or buckets
    fn capacity(&self) -> usize;

    /// Snapshot of occupancy
    fn stats(&self) -> TableStats;
}

/// `key mod modulus`, always in `0..modulus`, for any sign of `key`
pub(crate) fn reduce(key: i64, modulus: usize) -> usize {
    (key as i128).rem_euclid(modulus as i128) as usize
}
