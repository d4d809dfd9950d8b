//! Object pool for reusable values.

/// A value that can be returned to a [`Pool`] and handed out again.
pub trait Poolable: Default {
    /// Return the value to its freshly-constructed state, keeping any
    /// allocations it owns.
    fn reset(&mut self);
}

/// Free list of reset values.
///
/// Released values are reset and kept up to `capacity`; beyond that they
/// are dropped.
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    capacity: usize,
}

impl<T: Poolable> Pool<T> {
    /// Create an empty pool that retains at most `capacity` idle values.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Take an idle value, or construct a new one if none is idle.
    pub fn fetch(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Hand a value back for reuse.
    pub fn release(&mut self, mut item: T) {
        if self.free.len() >= self.capacity {
            return;
        }
        item.reset();
        self.free.push(item);
    }

    /// Number of idle values ready for reuse.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Maximum number of idle values retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
