//! Index-stable entity storage.
//!
//! Each entity kind lives in its own [`EntityStore`].  Indices stay valid for
//! the whole of a scan: removal only *marks* a slot, and [`EntityStore::compact`]
//! drops the marked slots once the scan is over.  Inserts append past the end,
//! so a scan over `0..len()` taken before the insert never sees them.

/// Growable arena with a hard capacity and deferred removal.
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    items: Vec<T>,
    removed: Vec<bool>,
    pending_removals: usize,
    capacity: usize,
}

impl<T> EntityStore<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            removed: Vec::new(),
            pending_removals: 0,
            capacity,
        }
    }

    /// Append an entity.  Returns its index, or `None` (dropping the entity)
    /// when the live population is already at capacity.
    pub fn insert(&mut self, item: T) -> Option<usize> {
        if self.live_len() >= self.capacity {
            return None;
        }
        self.items.push(item);
        self.removed.push(false);
        Some(self.items.len() - 1)
    }

    /// Mark `index` for removal at the next [`compact`](Self::compact).
    /// Marking twice is a no-op.
    pub fn mark_removed(&mut self, index: usize) {
        if let Some(flag) = self.removed.get_mut(index) {
            if !*flag {
                *flag = true;
                self.pending_removals += 1;
            }
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.removed.get(index).copied().unwrap_or(false)
    }

    /// Drop every marked slot, preserving the order of survivors.
    pub fn compact(&mut self) {
        if self.pending_removals == 0 {
            return;
        }
        let mut flags = self.removed.iter();
        self.items.retain(|_| !flags.next().copied().unwrap_or(false));
        self.removed.clear();
        self.removed.resize(self.items.len(), false);
        self.pending_removals = 0;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.removed.clear();
        self.pending_removals = 0;
    }

    /// Slot count including marked slots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slots not marked for removal.
    pub fn live_len(&self) -> usize {
        self.items.len() - self.pending_removals
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Every slot, marked or not.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_slots_keep_indices_until_compaction() {
        let mut store = EntityStore::new(8);
        for v in [10, 20, 30, 40] {
            store.insert(v);
        }
        store.mark_removed(1);
        store.mark_removed(1);
        assert_eq!(store.len(), 4);
        assert_eq!(store.live_len(), 3);
        assert_eq!(store.get(2), Some(&30));

        store.compact();
        assert_eq!(store.as_slice(), &[10, 30, 40]);
        assert!(!store.is_marked(1));
    }

    #[test]
    fn insert_beyond_capacity_is_dropped() {
        let mut store = EntityStore::new(2);
        assert_eq!(store.insert('a'), Some(0));
        assert_eq!(store.insert('b'), Some(1));
        assert_eq!(store.insert('c'), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn marked_slots_free_capacity_before_compaction() {
        let mut store = EntityStore::new(2);
        store.insert(1);
        store.insert(2);
        store.mark_removed(0);
        assert_eq!(store.insert(3), Some(2));
        store.compact();
        assert_eq!(store.as_slice(), &[2, 3]);
    }
}
