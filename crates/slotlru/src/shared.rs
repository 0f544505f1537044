//! SharedLruCache: lock-guarded LRU cache for use across threads
//!
//! The index and the recency list are always mutated together, so a single
//! lock guards the whole `LruCache`. `get` promotes its entry and therefore
//! takes the write lock like every other mutation.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::LruCache;
use crate::error::Result;

/// Cloneable handle to an LRU cache behind a `RwLock`
pub struct SharedLruCache<K, V> {
    inner: Arc<RwLock<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries held at once
    ///
    /// # Returns
    /// * `Result<SharedLruCache>` - `Error::InvalidConfiguration` if capacity is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from(LruCache::new(capacity)?))
    }

    /// Get a copy of a value and mark it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Insert or update a key-value pair
    pub fn put(&self, key: K, value: V) {
        let mut cache = self.inner.write();
        cache.put(key, value);
    }

    /// Remove a key, returning its value if it was present
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.write();
        cache.delete(key)
    }

    /// Get a copy of a value without promoting it
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().peek(key).cloned()
    }

    /// Check whether a key is present without promoting it
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains(key)
    }

    /// Copy out every entry, most recently used first
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Run a closure with shared access to the underlying cache
    pub fn with_read<R>(&self, f: impl FnOnce(&LruCache<K, V>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<K, V> From<LruCache<K, V>> for SharedLruCache<K, V> {
    fn from(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }
}
