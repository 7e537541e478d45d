use deck_core::{ChartError, Result};

/// Fixed-capacity window of samples with overwrite-oldest insertion.
///
/// The buffer is full from the moment it is built: `new` pre-fills every
/// slot, and each `push` discards exactly one sample, the oldest.  Storage is
/// a ring so `push` is O(1); readers always see oldest-to-newest order.
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    slots: Vec<T>,
    /// Index of the oldest sample.
    head:  usize,
}

impl<T> RollingBuffer<T> {
    /// Build a buffer of `capacity` slots, each filled by `seed`.
    pub fn new(capacity: usize, mut seed: impl FnMut() -> T) -> Result<Self> {
        if capacity == 0 {
            return Err(ChartError::InvalidCapacity(capacity));
        }
        let slots = (0..capacity).map(|_| seed()).collect();
        Ok(Self { slots, head: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append `value` as the newest sample, evicting the oldest.
    pub fn push(&mut self, value: T) {
        self.slots[self.head] = value;
        self.head = (self.head + 1) % self.slots.len();
    }

    /// Newest sample.
    pub fn latest(&self) -> &T {
        let last = (self.head + self.slots.len() - 1) % self.slots.len();
        &self.slots[last]
    }

    /// Oldest-to-newest iteration without allocating.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        Chain { older: older.iter(), newer: newer.iter() }
    }
}

impl<T: Clone> RollingBuffer<T> {
    /// Current window, oldest first.  Always exactly `capacity` long.
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// `older` then `newer`, with an exact length (std's `Chain` has none).
struct Chain<'a, T> {
    older: std::slice::Iter<'a, T>,
    newer: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Chain<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.older.next().or_else(|| self.newer.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.older.len() + self.newer.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Chain<'_, T> {}
