//! Fixed-capacity circular FIFO queue.

/// A ring buffer that never reallocates after construction.
///
/// Enqueueing into a full queue hands the element back instead of growing.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    len: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` elements (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Append an element, or return it back if the queue is full.
    pub fn enqueue(&mut self, element: T) -> Result<(), T> {
        if self.is_full() {
            return Err(element);
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(element);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest element.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let element = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        element
    }

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

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_when_full() {
        let mut queue = BoundedQueue::new(2);
        assert_eq!(queue.enqueue(1), Ok(()));
        assert_eq!(queue.enqueue(2), Ok(()));
        assert!(queue.is_full());
        assert_eq!(queue.enqueue(3), Err(3));
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn test_wraps_around() {
        let mut queue = BoundedQueue::new(3);
        for round in 0..10 {
            queue.enqueue(round).unwrap();
            queue.enqueue(round + 100).unwrap();
            assert_eq!(queue.dequeue(), Some(round));
            assert_eq!(queue.dequeue(), Some(round + 100));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = BoundedQueue::new(4);
        queue.enqueue("x").unwrap();
        queue.enqueue("y").unwrap();
        queue.clear();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.dequeue(), None);
    }
}
