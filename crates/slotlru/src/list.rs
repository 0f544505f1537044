//! Recency ordering
//!
//! Doubly-linked list over arena slots, bounded by the head and tail
//! sentinels. Because both ends are real slots, linking and unlinking never
//! special-case an empty list or an entry at either boundary.

use crate::arena::{Arena, Entry, SlotId, HEAD, TAIL};

/// Entries ordered from most recently used (after `HEAD`) to least recently
/// used (before `TAIL`)
pub(crate) struct RecencyList<K, V> {
    arena: Arena<K, V>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            len: 0,
        }
    }

    /// Number of linked entries
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Most recently used slot
    pub(crate) fn front(&self) -> Option<SlotId> {
        Some(self.arena.next(HEAD)).filter(|&idx| idx != TAIL)
    }

    /// Least recently used slot
    pub(crate) fn back(&self) -> Option<SlotId> {
        Some(self.arena.prev(TAIL)).filter(|&idx| idx != HEAD)
    }

    /// Allocate a slot for `entry` and link it as most recently used
    pub(crate) fn push_front(&mut self, entry: Entry<K, V>) -> SlotId {
        let idx = self.arena.alloc(entry);
        self.link_front(idx);
        self.len += 1;
        idx
    }

    /// Promote a linked slot to most recently used
    pub(crate) fn move_to_front(&mut self, idx: SlotId) {
        if self.arena.next(HEAD) == idx {
            return; // Already at front
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    /// Unlink a slot and release it, returning its entry
    pub(crate) fn remove(&mut self, idx: SlotId) -> Option<Entry<K, V>> {
        if idx == HEAD || idx == TAIL || self.arena.entry(idx).is_none() {
            return None;
        }

        self.unlink(idx);
        self.len -= 1;
        self.arena.free(idx)
    }

    /// Swap the entry held by a linked slot without touching its position
    pub(crate) fn replace(&mut self, idx: SlotId, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        self.arena.replace(idx, entry)
    }

    pub(crate) fn entry(&self, idx: SlotId) -> Option<&Entry<K, V>> {
        self.arena.entry(idx)
    }

    pub(crate) fn entry_mut(&mut self, idx: SlotId) -> Option<&mut Entry<K, V>> {
        self.arena.entry_mut(idx)
    }

    /// Drop every entry and link the sentinels to each other
    pub(crate) fn clear(&mut self) {
        self.arena.reset();
        self.len = 0;
    }

    /// Walk from most to least recently used
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            cursor: self.arena.next(HEAD),
            remaining: self.len,
        }
    }

    fn link_front(&mut self, idx: SlotId) {
        let first = self.arena.next(HEAD);
        self.arena.set_prev(idx, HEAD);
        self.arena.set_next(idx, first);
        self.arena.set_prev(first, idx);
        self.arena.set_next(HEAD, idx);
    }

    fn unlink(&mut self, idx: SlotId) {
        let prev = self.arena.prev(idx);
        let next = self.arena.next(idx);
        self.arena.set_next(prev, next);
        self.arena.set_prev(next, prev);
        self.arena.set_prev(idx, idx);
        self.arena.set_next(idx, idx);
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.arena.slot_count()
    }

    /// Slot ids from front to back, panicking if any pair of neighbours
    /// disagrees about their link
    #[cfg(test)]
    pub(crate) fn checked_order(&self) -> Vec<SlotId> {
        let mut order = Vec::with_capacity(self.len);
        let mut cursor = HEAD;
        loop {
            let next = self.arena.next(cursor);
            assert_eq!(self.arena.prev(next), cursor, "broken back link at slot {next}");
            if next == TAIL {
                break;
            }
            assert!(self.arena.entry(next).is_some(), "linked slot {next} is empty");
            order.push(next);
            cursor = next;
            assert!(order.len() <= self.len, "list longer than its length counter");
        }
        assert_eq!(order.len(), self.len);
        order
    }
}

/// Iterator over `(key, value)` pairs, most recently used first
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    cursor: SlotId,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL || self.remaining == 0 {
            return None;
        }

        let entry = self.arena.entry(self.cursor)?;
        self.cursor = self.arena.next(self.cursor);
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, char>) -> Vec<u32> {
        list.iter().map(|(k, _)| *k).collect()
    }

    fn filled(keys: &[u32]) -> (RecencyList<u32, char>, Vec<SlotId>) {
        let mut list = RecencyList::with_capacity(keys.len());
        let ids = keys
            .iter()
            .map(|&key| list.push_front(Entry { key, value: 'x' }))
            .collect();
        (list, ids)
    }

    #[test]
    fn test_list_empty() {
        let list: RecencyList<u32, char> = RecencyList::with_capacity(2);

        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.checked_order().is_empty());
    }

    #[test]
    fn test_list_push_front_order() {
        let (list, ids) = filled(&[1, 2, 3]);

        assert_eq!(keys(&list), vec![3, 2, 1]);
        assert_eq!(list.front(), Some(ids[2]));
        assert_eq!(list.back(), Some(ids[0]));
        assert_eq!(list.checked_order(), vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn test_list_move_to_front() {
        let (mut list, ids) = filled(&[1, 2, 3]);

        list.move_to_front(ids[0]);
        assert_eq!(keys(&list), vec![1, 3, 2]);

        // Already at front: no change
        list.move_to_front(ids[0]);
        assert_eq!(keys(&list), vec![1, 3, 2]);

        list.move_to_front(ids[2]);
        assert_eq!(keys(&list), vec![3, 1, 2]);
        list.checked_order();
    }

    #[test]
    fn test_list_remove_middle_and_ends() {
        let (mut list, ids) = filled(&[1, 2, 3, 4]);

        assert_eq!(list.remove(ids[1]).map(|e| e.key), Some(2));
        assert_eq!(keys(&list), vec![4, 3, 1]);

        assert_eq!(list.remove(ids[3]).map(|e| e.key), Some(4));
        assert_eq!(list.remove(ids[0]).map(|e| e.key), Some(1));
        assert_eq!(keys(&list), vec![3]);
        assert_eq!(list.len(), 1);
        list.checked_order();
    }

    #[test]
    fn test_list_remove_rejects_sentinels_and_freed_slots() {
        let (mut list, ids) = filled(&[1]);

        assert!(list.remove(HEAD).is_none());
        assert!(list.remove(TAIL).is_none());
        assert!(list.remove(ids[0]).is_some());
        assert!(list.remove(ids[0]).is_none());
        assert_eq!(list.len(), 0);
        list.checked_order();
    }

    #[test]
    fn test_list_replace_keeps_position() {
        let (mut list, ids) = filled(&[1, 2]);

        let old = list.replace(ids[0], Entry { key: 7, value: 'y' });
        assert_eq!(old.map(|e| e.key), Some(1));
        assert_eq!(keys(&list), vec![2, 7]);
    }

    #[test]
    fn test_list_clear() {
        let (mut list, _) = filled(&[1, 2, 3]);

        list.clear();
        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().count(), 0);

        list.push_front(Entry { key: 5, value: 'z' });
        assert_eq!(keys(&list), vec![5]);
        list.checked_order();
    }

    #[test]
    fn test_list_iter_exact_size() {
        let (list, _) = filled(&[1, 2, 3]);
        assert_eq!(list.iter().len(), 3);
    }
}
