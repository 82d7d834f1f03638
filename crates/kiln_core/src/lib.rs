//! Kiln Core - execution substrate for the renderer.
//!
//! This crate provides:
//!
//! - **Containers**: `GrowArray`, `RingQueue`, `BoundedQueue`
//! - **Worker pool**: ticketed submit/join of per-tile worker cohorts
//!
//! # Example
//!
//! ```ignore
//! use kiln_core::{JobDescriptor, WorkerPool};
//!
//! let pool = WorkerPool::default();
//! pool.scope(|scope| {
//!     let job = JobDescriptor::with_args(render_tile, tiles)?;
//!     let ticket = scope.submit(job)?;
//!     scope.join(ticket)
//! })?;
//! ```

pub mod containers;
pub mod pool;

// Re-export commonly used types
pub use containers::{BoundedQueue, GrowArray, RingQueue};
pub use pool::{JobDescriptor, PoolError, PoolScope, Ticket, WorkerPool, DEFAULT_TICKET_CAPACITY};
