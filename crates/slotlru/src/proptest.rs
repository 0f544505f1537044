//! Property-Based Tests for the LRU cache
//!
//! Drives `LruCache` with random operation sequences and compares every
//! step against a plain `Vec` kept in most-recently-used-first order.
//!
//! # Test Properties
//!
//! 1. **Capacity**: size never exceeds capacity
//! 2. **Consistency**: index keys == keys reachable through the recency list
//! 3. **Recency**: a successful get/put leaves its key most recently used
//! 4. **Eviction**: N+1 distinct puts into capacity N drop exactly the first key
//! 5. **Delete frees capacity**: a put after a delete evicts nothing

#![cfg(test)]

use proptest::prelude::*;

use crate::cache::LruCache;

// =============================================================================
// Reference Model
// =============================================================================

/// Naive O(n) LRU: front of the vector is most recently used
struct Model {
    entries: Vec<(u8, u32)>,
    capacity: usize,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        let entry = self.entries.remove(pos);
        self.entries.insert(0, entry);
        Some(entry.1)
    }

    fn put(&mut self, key: u8, value: u32) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
        } else if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        self.entries.insert(0, (key, value));
    }

    fn delete(&mut self, key: u8) -> Option<u32> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }
}

#[derive(Debug, Clone)]
enum Op {
    Get(u8),
    Put(u8, u32),
    Delete(u8),
}

// =============================================================================
// Property Strategies
// =============================================================================

/// Small key space so that hits, updates and evictions all happen often
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..16).prop_map(Op::Get),
        4 => (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        1 => (0u8..16).prop_map(Op::Delete),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..200)
}

fn contents(cache: &LruCache<u8, u32>) -> Vec<(u8, u32)> {
    cache.iter().map(|(k, v)| (*k, *v)).collect()
}

// =============================================================================
// Model Equivalence Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every operation agrees with the reference model, and the internal
    /// structures stay consistent after each step
    #[test]
    fn prop_matches_reference_model(capacity in 1usize..=8, ops in ops_strategy()) {
        let mut cache = LruCache::new(capacity).unwrap();
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                Op::Get(k) => {
                    prop_assert_eq!(cache.get(&k).copied(), model.get(k));
                }
                Op::Put(k, v) => {
                    cache.put(k, v);
                    model.put(k, v);
                }
                Op::Delete(k) => {
                    prop_assert_eq!(cache.delete(&k), model.delete(k));
                }
            }

            cache.assert_consistent();
            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(contents(&cache), model.entries.clone());
        }
    }

    /// A successful get or put always leaves its key at the front
    #[test]
    fn prop_access_promotes(capacity in 1usize..=8, ops in ops_strategy()) {
        let mut cache = LruCache::new(capacity).unwrap();

        for op in ops {
            match op {
                Op::Get(k) => {
                    if cache.get(&k).is_some() {
                        prop_assert_eq!(cache.peek_mru().map(|(k, _)| *k), Some(k));
                    }
                }
                Op::Put(k, v) => {
                    cache.put(k, v);
                    prop_assert_eq!(cache.peek_mru(), Some((&k, &v)));
                }
                Op::Delete(k) => {
                    cache.delete(&k);
                    prop_assert!(!cache.contains(&k));
                }
            }
        }
    }
}

// =============================================================================
// Eviction Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Capacity N, N+1 distinct puts: only the first key is evicted
    #[test]
    fn prop_eviction_drops_oldest(capacity in 1usize..=32) {
        let mut cache = LruCache::new(capacity).unwrap();

        for key in 0..=capacity {
            cache.put(key, key * 2);
        }

        prop_assert!(!cache.contains(&0));
        for key in 1..=capacity {
            prop_assert!(cache.contains(&key));
        }
        prop_assert_eq!(cache.peek_mru().map(|(k, _)| *k), Some(capacity));
        prop_assert_eq!(cache.stats().evictions(), 1);
        cache.assert_consistent();
    }

    /// Deleting from a full cache lets the next new key in without eviction
    #[test]
    fn prop_delete_frees_capacity(capacity in 1usize..=32, victim_seed in any::<usize>()) {
        let mut cache = LruCache::new(capacity).unwrap();
        for key in 0..capacity {
            cache.put(key, ());
        }

        let victim = victim_seed % capacity;
        prop_assert_eq!(cache.delete(&victim), Some(()));
        cache.put(capacity, ());

        prop_assert_eq!(cache.stats().evictions(), 0);
        prop_assert_eq!(cache.len(), capacity);
        for key in (0..capacity).filter(|k| *k != victim) {
            prop_assert!(cache.contains(&key));
        }
        cache.assert_consistent();
    }

    /// Two gets in a row see the same value and leave the same order
    #[test]
    fn prop_repeated_get_is_idempotent(
        keys in prop::collection::vec(0u8..16, 1..16),
        probe in 0u8..16,
    ) {
        let mut cache = LruCache::new(8).unwrap();
        for (i, k) in keys.iter().enumerate() {
            cache.put(*k, i as u32);
        }

        let first = cache.get(&probe).copied();
        let order_after_first = contents(&cache);
        let second = cache.get(&probe).copied();

        prop_assert_eq!(first, second);
        prop_assert_eq!(contents(&cache), order_after_first);
    }
}
