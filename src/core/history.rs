use std::collections::VecDeque;

/// Fixed-capacity FIFO. Pushing into a full buffer evicts the oldest entry,
/// so `len() <= capacity()` always holds.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }
}

impl<T: Clone> BoundedHistory<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut history = BoundedHistory::new(3);
        for i in 0..5 {
            history.push(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![2, 3, 4]);
        assert_eq!(history.last(), Some(&4));
        assert_eq!(history.capacity(), 3);
        let newest_first: Vec<_> = history.iter().rev().copied().collect();
        assert_eq!(newest_first, vec![4, 3, 2]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = BoundedHistory::new(0);
        history.push(1.0);
        assert!(history.is_empty());
    }
}
