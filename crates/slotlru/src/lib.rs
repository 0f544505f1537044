//! # slotlru
//!
//! Fixed-capacity Least-Recently-Used cache with O(1) get, put and delete.
//!
//! ## Architecture
//! - **Arena**: entries live in `Vec` slots addressed by stable ids
//! - **Recency list**: doubly-linked through slot ids, bounded by head/tail
//!   sentinel slots (MRU after head, LRU before tail)
//! - **Index**: AHash map from key to slot id
//! - **Façade**: `LruCache` keeps index and list in step; `SharedLruCache`
//!   puts the whole thing behind one lock for multi-threaded callers
//!
//! ```
//! use slotlru::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put("k1", "v1");
//! cache.put("k2", "v2");
//! cache.get("k1");
//! cache.put("k3", "v3"); // evicts k2
//!
//! assert_eq!(cache.to_string(), "[(k3, v3)(k1, v1)]");
//! ```

#![warn(missing_docs)]

mod arena;
mod cache;
mod error;
mod list;
mod proptest;
mod shared;
mod stats;

pub use cache::LruCache;
pub use error::{Error, Result};
pub use list::Iter;
pub use shared::SharedLruCache;
pub use stats::CacheStats;
