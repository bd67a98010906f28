//! Table statistics snapshot

use serde::Serialize;

/// Point-in-time view of a table's occupancy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableStats {
    /// Live entries
    pub len: usize,
    /// Slots (open addressing) or buckets (chaining)
    pub capacity: usize,
    /// `len / capacity`
    pub load_factor: f64,
    /// Number of rehashes since construction
    pub rehash_count: usize,
    /// Deleted-slot markers; always 0 for chaining
    pub tombstones: usize,
    /// Slots or buckets holding nothing
    pub empty_buckets: usize,
    /// Longest bucket (chaining) or longest run of non-empty slots (open addressing)
    pub longest_chain: usize,
}

impl TableStats {
    /// Share of empty slots/buckets (0.0 to 1.0)
    pub fn empty_ratio(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.empty_buckets as f64 / self.capacity as f64
        }
    }
}
