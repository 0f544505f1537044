//! LRU cache façade
//!
//! Couples the direct-access index (key -> slot id) with the recency list.
//! Every mutation touches both in the same call, so a caller can never
//! observe one without the other.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::arena::{Entry, SlotId};
use crate::error::{Error, Result};
use crate::list::{Iter, RecencyList};
use crate::stats::CacheStats;

/// Fixed-capacity LRU cache with O(1) get, put and delete
pub struct LruCache<K, V> {
    map: HashMap<K, SlotId, RandomState>,
    list: RecencyList<K, V>,
    capacity: usize,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries held at once
    ///
    /// # Returns
    /// * `Result<LruCache>` - `Error::InvalidConfiguration` if capacity is 0
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or(Error::InvalidConfiguration { capacity })?;
        Ok(Self::with_capacity(capacity))
    }

    /// Create a new LRU cache from an already validated capacity
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            list: RecencyList::with_capacity(capacity),
            capacity,
            stats: CacheStats::new(),
        }
    }

    /// Get a value and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.map.get(key) {
            Some(&idx) => {
                self.stats.record_hit();
                self.list.move_to_front(idx);
                self.list.entry(idx).map(|entry| &entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Remove a key, returning its value if it was present
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        let entry = self.list.remove(idx)?;

        self.stats.record_delete();
        trace!(len = self.map.len(), "deleted entry");
        Some(entry.value)
    }

    /// Get a value without touching its recency or the statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.list.entry(idx).map(|entry| &entry.value)
    }

    /// Check whether a key is present without promoting it
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Clear the cache (statistics are kept)
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        trace!(capacity = self.capacity, "cleared cache");
    }

    /// Assert that the index and the recency list describe the same entries
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let order = self.list.checked_order();
        assert_eq!(order.len(), self.map.len(), "index and list sizes differ");
        assert!(self.map.len() <= self.capacity, "size exceeds capacity");

        for idx in order {
            let entry = self.list.entry(idx).expect("linked slot holds an entry");
            assert_eq!(self.map.get(&entry.key), Some(&idx), "index points elsewhere");
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.list.slot_count()
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Insert or update a key-value pair, making it most recently used
    ///
    /// When a new key arrives at capacity, the least recently used entry is
    /// evicted and its slot reused for the new key.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            // Update existing
            if let Some(entry) = self.list.entry_mut(idx) {
                entry.value = value;
            }
            self.list.move_to_front(idx);
            self.stats.record_update();
            return;
        }

        if self.map.len() >= self.capacity {
            if let Some(idx) = self.list.back() {
                let evicted = self.list.replace(
                    idx,
                    Entry {
                        key: key.clone(),
                        value,
                    },
                );
                if let Some(old) = evicted {
                    self.map.remove(&old.key);
                }
                self.list.move_to_front(idx);
                self.map.insert(key, idx);

                self.stats.record_eviction();
                self.stats.record_insert();
                debug!(
                    capacity = self.capacity,
                    slot = idx,
                    "evicted least recently used entry"
                );
                return;
            }
        }

        let idx = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, idx);
        self.stats.record_insert();
    }
}

impl<K, V> LruCache<K, V> {
    /// Most recently used entry
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        let idx = self.list.front()?;
        self.list.entry(idx).map(|entry| (&entry.key, &entry.value))
    }

    /// Least recently used entry, the next eviction candidate
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        let idx = self.list.back()?;
        self.list.entry(idx).map(|entry| (&entry.key, &entry.value))
    }

    /// Iterate over entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders `[(k, v)(k, v)]`, most recently used first
impl<K: fmt::Display, V: fmt::Display> fmt::Display for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (key, value) in self.iter() {
            write!(f, "({}, {})", key, value)?;
        }
        write!(f, "]")
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a LruCache<K, V>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
