//! Growable and fixed-capacity containers.
//!
//! None of these are thread-safe; the worker pool wraps the ones it shares
//! in a mutex.

mod bounded_queue;
mod grow_array;
mod ring_queue;

pub use bounded_queue::BoundedQueue;
pub use grow_array::GrowArray;
pub use ring_queue::{Drain, RingQueue};
