//! Worker pool for tile dispatch.
//!
//! A submission hands the pool one function and a batch of argument blobs;
//! the pool spawns one OS thread per blob and hands back a [`Ticket`] that
//! identifies the cohort. Joining the ticket blocks until every worker of
//! the cohort has finished. There is no cancellation: once a worker starts,
//! it runs to completion.
//!
//! Tickets come out of a fixed-size table. The worker that finishes last
//! returns its cohort's slot to the table, so a slot is only ever owned by
//! one live cohort.
//!
//! Workers are scoped threads, so jobs may borrow from the caller's stack
//! (the framebuffer and the scene) for the duration of [`WorkerPool::scope`].

use crate::containers::{BoundedQueue, GrowArray, RingQueue};
use std::cell::RefCell;
use std::collections::TryReserveError;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};
use thiserror::Error;

/// Number of cohorts that may be in flight at once.
pub const DEFAULT_TICKET_CAPACITY: usize = 64;

/// Errors raised while dispatching or joining worker cohorts.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("All {capacity} worker tickets are in use")]
    TicketsExhausted { capacity: usize },

    #[error("Failed to spawn worker {index} of cohort {ticket}: {source}")]
    ThreadCreation {
        ticket: Ticket,
        index: usize,
        source: std::io::Error,
    },

    #[error("{count} worker(s) of cohort {ticket} panicked")]
    WorkerPanicked { ticket: Ticket, count: usize },

    #[error("Ticket {0} is not pending in this scope")]
    UnknownTicket(Ticket),

    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Opaque handle for one cohort of dispatched workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    slot: usize,
    serial: u64,
}

impl Ticket {
    /// Index of the ticket-table slot held by this cohort.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.slot, self.serial)
    }
}

/// A job function plus one argument blob per worker instance.
///
/// Each argument is moved into exactly one worker and dropped there once
/// the function returns.
pub struct JobDescriptor<A> {
    function: fn(A),
    args: RingQueue<A>,
}

impl<A> JobDescriptor<A> {
    /// Create a descriptor with no instances yet.
    pub fn new(function: fn(A)) -> Result<Self, PoolError> {
        Ok(Self {
            function,
            args: RingQueue::with_capacity(1)?,
        })
    }

    /// Create a descriptor with one instance per argument.
    pub fn with_args<I>(function: fn(A), args: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = A>,
    {
        let args = args.into_iter();
        let mut queue = RingQueue::with_capacity(args.size_hint().0)?;
        for arg in args {
            queue.enqueue(arg)?;
        }
        Ok(Self {
            function,
            args: queue,
        })
    }

    /// Add another instance.
    pub fn push(&mut self, arg: A) -> Result<(), PoolError> {
        self.args.enqueue(arg)?;
        Ok(())
    }

    /// Number of workers a submission of this descriptor will spawn.
    pub fn instance_count(&self) -> usize {
        self.args.len()
    }
}

/// Thread pool handing out tickets from a fixed-capacity table.
pub struct WorkerPool {
    free_slots: Mutex<BoundedQueue<usize>>,
    capacity: usize,
    next_serial: AtomicU64,
    stack_size: Option<usize>,
}

impl WorkerPool {
    /// Create a pool whose ticket table has `ticket_capacity` slots (at least one).
    pub fn new(ticket_capacity: usize) -> Self {
        let capacity = ticket_capacity.max(1);
        let mut free_slots = BoundedQueue::new(capacity);
        for slot in 0..capacity {
            let queued = free_slots.enqueue(slot);
            debug_assert!(queued.is_ok());
        }

        Self {
            free_slots: Mutex::new(free_slots),
            capacity,
            next_serial: AtomicU64::new(0),
            stack_size: None,
        }
    }

    /// Set the stack size, in bytes, of spawned workers.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Total number of ticket slots.
    pub fn ticket_capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently owned by a cohort.
    pub fn tickets_in_use(&self) -> usize {
        self.capacity - self.lock_slots().len()
    }

    /// Open a dispatch scope.
    ///
    /// Jobs submitted inside may borrow anything that outlives the call.
    /// Cohorts that were not joined explicitly are joined before this
    /// returns; their failures are logged.
    pub fn scope<'env, F, T>(&'env self, f: F) -> T
    where
        F: for<'scope> FnOnce(&PoolScope<'scope, 'env>) -> T,
    {
        thread::scope(|scope| {
            let pool_scope = PoolScope {
                pool: self,
                scope,
                cohorts: RefCell::new(GrowArray::new()),
            };
            let result = f(&pool_scope);
            pool_scope.join_remaining();
            result
        })
    }

    fn lock_slots(&self) -> MutexGuard<'_, BoundedQueue<usize>> {
        self.free_slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> Result<Ticket, PoolError> {
        let slot = self
            .lock_slots()
            .dequeue()
            .ok_or(PoolError::TicketsExhausted {
                capacity: self.capacity,
            })?;
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        Ok(Ticket { slot, serial })
    }

    fn release(&self, ticket: Ticket) {
        if self.lock_slots().enqueue(ticket.slot).is_err() {
            log::error!("Ticket slot {} released while the table was full", ticket.slot);
            return;
        }
        log::debug!("Cohort {} finished, slot {} is free", ticket, ticket.slot);
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_CAPACITY)
    }
}

/// Shared count of workers still running in one cohort.
struct ActiveCount<'pool> {
    remaining: AtomicUsize,
    ticket: Ticket,
    pool: &'pool WorkerPool,
}

impl ActiveCount<'_> {
    /// Mark `finished` instances as done; the call that reaches zero frees the slot.
    fn retire(&self, finished: usize) {
        let before = self.remaining.fetch_sub(finished, Ordering::AcqRel);
        if before == finished {
            self.pool.release(self.ticket);
        }
    }
}

/// Retires one instance when dropped, including during a panic unwind.
struct RetireOnDrop<'pool>(Arc<ActiveCount<'pool>>);

impl Drop for RetireOnDrop<'_> {
    fn drop(&mut self) {
        self.0.retire(1);
    }
}

struct Cohort<'scope> {
    ticket: Ticket,
    workers: GrowArray<ScopedJoinHandle<'scope, ()>>,
}

/// Submission and join interface valid inside [`WorkerPool::scope`].
pub struct PoolScope<'scope, 'env: 'scope> {
    pool: &'env WorkerPool,
    scope: &'scope Scope<'scope, 'env>,
    cohorts: RefCell<GrowArray<Cohort<'scope>>>,
}

impl<'scope, 'env> PoolScope<'scope, 'env> {
    /// Spawn one worker per argument of `job` and return the cohort's ticket.
    ///
    /// If a worker fails to spawn, the remaining arguments are dropped
    /// unrun, the workers already running are joined, and the spawn error
    /// is returned.
    pub fn submit<A>(&self, job: JobDescriptor<A>) -> Result<Ticket, PoolError>
    where
        A: Send + 'env,
    {
        let JobDescriptor { function, mut args } = job;
        let instance_count = args.len();

        let ticket = self.pool.acquire()?;
        if instance_count == 0 {
            self.pool.release(ticket);
        }

        let active = Arc::new(ActiveCount {
            remaining: AtomicUsize::new(instance_count),
            ticket,
            pool: self.pool,
        });

        let mut workers = match GrowArray::with_capacity(instance_count) {
            Ok(workers) => workers,
            Err(err) => {
                if instance_count > 0 {
                    active.retire(instance_count);
                }
                return Err(err.into());
            }
        };

        for (index, arg) in args.drain().enumerate() {
            let mut builder = thread::Builder::new().name(format!("kiln-worker-{}-{}", ticket.slot, index));
            if let Some(bytes) = self.pool.stack_size {
                builder = builder.stack_size(bytes);
            }

            let worker_active = Arc::clone(&active);
            let spawned = builder.spawn_scoped(self.scope, move || {
                let _retire = RetireOnDrop(worker_active);
                function(arg);
            });

            match spawned {
                Ok(handle) => workers.push(handle)?,
                Err(source) => {
                    let unspawned = instance_count - index;
                    log::error!(
                        "Worker {} of cohort {} failed to spawn ({}); dropping {} unspawned instance(s)",
                        index,
                        ticket,
                        source,
                        unspawned
                    );
                    active.retire(unspawned);

                    let panicked = join_workers(workers);
                    if panicked > 0 {
                        log::error!("{} worker(s) of aborted cohort {} panicked", panicked, ticket);
                    }
                    return Err(PoolError::ThreadCreation {
                        ticket,
                        index,
                        source,
                    });
                }
            }
        }

        log::debug!("Cohort {} dispatched with {} worker(s)", ticket, instance_count);
        self.cohorts.borrow_mut().push(Cohort { ticket, workers })?;
        Ok(ticket)
    }

    /// Block until every worker of `ticket` has terminated.
    pub fn join(&self, ticket: Ticket) -> Result<(), PoolError> {
        let cohort = {
            let mut cohorts = self.cohorts.borrow_mut();
            let position = cohorts
                .iter()
                .position(|cohort| cohort.ticket == ticket)
                .ok_or(PoolError::UnknownTicket(ticket))?;
            cohorts
                .remove_at(position)
                .ok_or(PoolError::UnknownTicket(ticket))?
        };

        let panicked = join_workers(cohort.workers);
        if panicked > 0 {
            return Err(PoolError::WorkerPanicked {
                ticket,
                count: panicked,
            });
        }
        Ok(())
    }

    /// Number of submitted cohorts not yet joined.
    pub fn pending(&self) -> usize {
        self.cohorts.borrow().len()
    }

    fn join_remaining(&self) {
        loop {
            let ticket = match self.cohorts.borrow().front() {
                Some(cohort) => cohort.ticket,
                None => break,
            };
            log::warn!("Cohort {} was never joined; joining at scope exit", ticket);
            if let Err(err) = self.join(ticket) {
                log::error!("{}", err);
            }
        }
    }
}

/// Join every handle, returning how many workers panicked.
fn join_workers(workers: GrowArray<ScopedJoinHandle<'_, ()>>) -> usize {
    workers
        .into_iter()
        .map(ScopedJoinHandle::join)
        .filter(Result::is_err)
        .count()
}
