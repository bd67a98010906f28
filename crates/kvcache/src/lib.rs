//! # kvcache
//!
//! Fixed-capacity LRU cache with O(1) `get` and `set`.
//!
//! ## Architecture
//! - **Index**: AHash map from key to list node (O(1) lookup)
//! - **Recency list**: arena-backed doubly linked list with head/tail
//!   sentinels (O(1) move-to-front and tail eviction)
//! - **Stats**: hit/miss/eviction counters

#![warn(missing_docs)]

mod list;
mod lru;
mod stats;

pub use kvtable::{Error, Result};
pub use lru::{LruCache, MISS};
pub use stats::CacheStats;
