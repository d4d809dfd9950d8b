//! Growable ring buffer with indexed access.

use std::ops::{Index, IndexMut};

const MIN_CAPACITY: usize = 4;

/// FIFO ring buffer supporting O(1) enqueue, dequeue, peek, and random
/// access by logical index (0 = oldest). Doubles its storage when full.
#[derive(Debug, Clone)]
pub struct CircularArray<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> CircularArray<T> {
    /// Create an empty ring with no storage allocated.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            len: 0,
        }
    }

    /// Create an empty ring with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no items are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of items the ring holds before it has to grow.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Add an item at the back (newest position).
    pub fn enqueue(&mut self, item: T) {
        if self.len == self.slots.len() {
            self.grow();
        }
        let idx = self.physical(self.len);
        self.slots[idx] = Some(item);
        self.len += 1;
    }

    /// Remove and return the oldest item.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
        }
        item
    }

    /// The oldest item, if any.
    pub fn peek(&self) -> Option<&T> {
        self.get(0)
    }

    /// Mutable access to the oldest item.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// The newest item, if any.
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Item at logical index `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[self.physical(index)].as_ref()
    }

    /// Mutable item at logical index `index` (0 = oldest).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let idx = self.physical(index);
        self.slots[idx].as_mut()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        // Occupied slots are contiguous (mod capacity) starting at `head`;
        // every other slot is `None`.
        let (wrapped, front) = self.slots.split_at(self.head);
        front.iter().chain(wrapped.iter()).filter_map(Option::as_ref)
    }

    /// Mutably iterate oldest to newest.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        let (wrapped, front) = self.slots.split_at_mut(self.head);
        front
            .iter_mut()
            .chain(wrapped.iter_mut())
            .filter_map(Option::as_mut)
    }

    /// Remove every item, oldest first, handing each to `f`.
    pub fn drain_with(&mut self, mut f: impl FnMut(T)) {
        while let Some(item) = self.dequeue() {
            f(item);
        }
    }

    /// Drop every item. Storage is kept.
    pub fn clear(&mut self) {
        self.drain_with(drop);
    }

    fn physical(&self, index: usize) -> usize {
        (self.head + index) % self.slots.len()
    }

    fn grow(&mut self) {
        let new_cap = (self.slots.len() * 2).max(MIN_CAPACITY);
        let mut slots: Vec<Option<T>> = Vec::with_capacity(new_cap);
        while let Some(item) = self.dequeue() {
            slots.push(Some(item));
        }
        self.len = slots.len();
        slots.resize_with(new_cap, || None);
        self.slots = slots;
        self.head = 0;
    }
}

impl<T> Default for CircularArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for CircularArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {index} out of range for ring of length {}", self.len),
        }
    }
}

impl<T> IndexMut<usize> for CircularArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index {index} out of range for ring of length {len}"),
        }
    }
}
