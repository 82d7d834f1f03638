//! Resizable array with explicit, fallible doubling growth.

use std::collections::TryReserveError;

/// A growable array that doubles its capacity when full.
///
/// Unlike `Vec::push`, growth reports allocation failure to the caller
/// instead of aborting. Not thread-safe; callers serialize access.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowArray<T> {
    items: Vec<T>,
}

impl<T> GrowArray<T> {
    /// Create an empty array without allocating.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items })
    }

    /// Append an element, doubling the capacity first if the array is full.
    pub fn push(&mut self, element: T) -> Result<(), TryReserveError> {
        if self.items.len() == self.items.capacity() {
            let additional = self.items.capacity().max(1);
            self.items.try_reserve_exact(additional)?;
        }
        self.items.push(element);
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove the element at `index`, shifting everything after it down.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Release unused capacity.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    /// Drop every element but keep the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn front(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Number of elements in use.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of elements the current allocation can hold.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for GrowArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for GrowArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
