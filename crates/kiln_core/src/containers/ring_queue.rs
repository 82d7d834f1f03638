//! Circular FIFO queue that grows when the ring fills up.

use std::collections::TryReserveError;

/// A first-in first-out queue backed by a ring buffer.
///
/// When an enqueue finds the ring full, the storage doubles and the
/// elements are re-linearized so the oldest one sits at slot 0.
#[derive(Debug, Clone)]
pub struct RingQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> RingQueue<T> {
    /// Create a queue with room for `capacity` elements (at least one).
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let capacity = capacity.max(1);
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);
        Ok(Self {
            slots,
            head: 0,
            len: 0,
        })
    }

    /// Append an element at the tail.
    pub fn enqueue(&mut self, element: T) -> Result<(), TryReserveError> {
        if self.len == self.slots.len() {
            self.grow()?;
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(element);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at the head.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let element = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        element
    }

    /// Element `offset` positions after the head (0 is the oldest).
    pub fn peek_first(&self, offset: usize) -> Option<&T> {
        if offset >= self.len {
            return None;
        }
        self.slots[(self.head + offset) % self.slots.len()].as_ref()
    }

    /// Element `offset` positions before the tail (0 is the newest).
    pub fn peek_last(&self, offset: usize) -> Option<&T> {
        if offset >= self.len {
            return None;
        }
        self.peek_first(self.len - 1 - offset)
    }

    /// Drop every element, keeping the storage.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterator that dequeues elements in FIFO order.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { queue: self }
    }

    /// Double the storage, copying the segment from head to the end of the
    /// ring first and the wrapped segment after it.
    fn grow(&mut self) -> Result<(), TryReserveError> {
        let old_capacity = self.slots.len();
        let mut slots: Vec<Option<T>> = Vec::new();
        slots.try_reserve_exact(old_capacity * 2)?;

        let (wrapped, from_head) = self.slots.split_at_mut(self.head);
        slots.extend(from_head.iter_mut().map(Option::take));
        slots.extend(wrapped.iter_mut().map(Option::take));
        slots.resize_with(old_capacity * 2, || None);

        self.slots = slots;
        self.head = 0;
        Ok(())
    }
}

/// Draining iterator returned by [`RingQueue::drain`].
pub struct Drain<'a, T> {
    queue: &'a mut RingQueue<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.dequeue()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = RingQueue::with_capacity(4).unwrap();
        for v in 1..=3 {
            queue.enqueue(v).unwrap();
        }
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_zero_capacity_rounds_up() {
        let mut queue = RingQueue::with_capacity(0).unwrap();
        assert_eq!(queue.capacity(), 1);
        queue.enqueue("a").unwrap();
        queue.enqueue("b").unwrap();
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_grow_relinearizes_wrapped_ring() {
        let mut queue = RingQueue::with_capacity(4).unwrap();
        for v in 0..4 {
            queue.enqueue(v).unwrap();
        }
        // Move the head forward so the ring wraps
        assert_eq!(queue.dequeue(), Some(0));
        assert_eq!(queue.dequeue(), Some(1));
        queue.enqueue(4).unwrap();
        queue.enqueue(5).unwrap();
        assert_eq!(queue.capacity(), 4);

        // Full and wrapped: this one forces a grow
        queue.enqueue(6).unwrap();
        assert_eq!(queue.capacity(), 8);
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek_first(0), Some(&2));
        assert_eq!(queue.peek_last(0), Some(&6));

        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_peek_offsets() {
        let mut queue = RingQueue::with_capacity(2).unwrap();
        for v in ['a', 'b', 'c', 'd'] {
            queue.enqueue(v).unwrap();
        }

        assert_eq!(queue.peek_first(0), Some(&'a'));
        assert_eq!(queue.peek_first(2), Some(&'c'));
        assert_eq!(queue.peek_last(0), Some(&'d'));
        assert_eq!(queue.peek_last(3), Some(&'a'));
        assert_eq!(queue.peek_first(4), None);
        assert_eq!(queue.peek_last(4), None);
    }

    #[test]
    fn test_clear() {
        let mut queue = RingQueue::with_capacity(3).unwrap();
        for v in 0..5 {
            queue.enqueue(v).unwrap();
        }
        let capacity = queue.capacity();

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), capacity);
        assert_eq!(queue.dequeue(), None);

        queue.enqueue(42).unwrap();
        assert_eq!(queue.peek_first(0), Some(&42));
    }
}
