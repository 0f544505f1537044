//! Entry storage
//!
//! Entries live in a `Vec` of slots addressed by stable `usize` ids. Links
//! between entries are slot ids rather than references, so removing an entry
//! can never leave a dangling pointer behind. Slots 0 and 1 are the head and
//! tail sentinels: allocated once, never freed, never holding an entry.

/// Stable address of a slot in the arena
pub(crate) type SlotId = usize;

/// Head sentinel; its successor is the most recently used entry
pub(crate) const HEAD: SlotId = 0;

/// Tail sentinel; its predecessor is the least recently used entry
pub(crate) const TAIL: SlotId = 1;

/// A live key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// One arena cell: optional payload plus ordering links
struct Slot<K, V> {
    entry: Option<Entry<K, V>>,
    prev: SlotId,
    next: SlotId,
}

impl<K, V> Slot<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// Slot arena with a free list for reuse of deleted entries
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<SlotId>,
}

impl<K, V> Arena<K, V> {
    /// Create an arena holding only the two sentinels, with room for
    /// `capacity` entries
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(2));
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());

        Self {
            slots,
            free_list: Vec::new(),
        }
    }

    /// Store an entry in a free slot, growing the arena if none is free.
    /// The new slot is unlinked (both links point at itself).
    pub(crate) fn alloc(&mut self, entry: Entry<K, V>) -> SlotId {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.entry = Some(entry);
            slot.prev = idx;
            slot.next = idx;
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Slot {
                entry: Some(entry),
                prev: idx,
                next: idx,
            });
            idx
        }
    }

    /// Take the entry out of a slot and hand the slot to the free list.
    /// The caller must have unlinked it first.
    pub(crate) fn free(&mut self, idx: SlotId) -> Option<Entry<K, V>> {
        debug_assert!(idx != HEAD && idx != TAIL, "sentinels are never freed");
        let entry = self.slots[idx].entry.take();
        if entry.is_some() {
            self.free_list.push(idx);
        }
        entry
    }

    /// Overwrite the entry in an occupied slot, returning the previous one
    pub(crate) fn replace(&mut self, idx: SlotId, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        self.slots[idx].entry.replace(entry)
    }

    pub(crate) fn entry(&self, idx: SlotId) -> Option<&Entry<K, V>> {
        self.slots.get(idx).and_then(|slot| slot.entry.as_ref())
    }

    pub(crate) fn entry_mut(&mut self, idx: SlotId) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(idx).and_then(|slot| slot.entry.as_mut())
    }

    pub(crate) fn prev(&self, idx: SlotId) -> SlotId {
        self.slots[idx].prev
    }

    pub(crate) fn next(&self, idx: SlotId) -> SlotId {
        self.slots[idx].next
    }

    pub(crate) fn set_prev(&mut self, idx: SlotId, prev: SlotId) {
        self.slots[idx].prev = prev;
    }

    pub(crate) fn set_next(&mut self, idx: SlotId, next: SlotId) {
        self.slots[idx].next = next;
    }

    /// Drop every entry and shrink back to the two sentinels
    pub(crate) fn reset(&mut self) {
        self.slots.truncate(2);
        self.free_list.clear();
        self.slots[HEAD] = Slot::sentinel();
        self.slots[TAIL] = Slot::sentinel();
    }

    /// Number of slots ever allocated, sentinels included
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u32, value: &'static str) -> Entry<u32, &'static str> {
        Entry { key, value }
    }

    #[test]
    fn test_arena_starts_with_sentinels() {
        let arena: Arena<u32, &str> = Arena::with_capacity(4);

        assert_eq!(arena.slot_count(), 2);
        assert!(arena.entry(HEAD).is_none());
        assert!(arena.entry(TAIL).is_none());
        assert_eq!(arena.next(HEAD), TAIL);
        assert_eq!(arena.prev(TAIL), HEAD);
    }

    #[test]
    fn test_arena_alloc_and_free() {
        let mut arena = Arena::with_capacity(4);

        let a = arena.alloc(entry(1, "a"));
        let b = arena.alloc(entry(2, "b"));
        assert_eq!((a, b), (2, 3));
        assert_eq!(arena.entry(a), Some(&entry(1, "a")));

        assert_eq!(arena.free(a), Some(entry(1, "a")));
        assert!(arena.entry(a).is_none());

        // Freeing twice does not put the slot on the free list twice
        assert_eq!(arena.free(a), None);

        let c = arena.alloc(entry(3, "c"));
        assert_eq!(c, a);
        let d = arena.alloc(entry(4, "d"));
        assert_eq!(d, 4);
    }

    #[test]
    fn test_arena_replace_in_place() {
        let mut arena = Arena::with_capacity(1);

        let idx = arena.alloc(entry(1, "a"));
        let old = arena.replace(idx, entry(9, "z"));

        assert_eq!(old, Some(entry(1, "a")));
        assert_eq!(arena.entry(idx), Some(&entry(9, "z")));
        assert_eq!(arena.slot_count(), 3);
    }

    #[test]
    fn test_arena_reset() {
        let mut arena = Arena::with_capacity(2);

        let a = arena.alloc(entry(1, "a"));
        arena.set_next(HEAD, a);
        arena.alloc(entry(2, "b"));
        arena.reset();

        assert_eq!(arena.slot_count(), 2);
        assert_eq!(arena.next(HEAD), TAIL);
        assert_eq!(arena.alloc(entry(3, "c")), 2);
    }
}
