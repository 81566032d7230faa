//! Bounded task pool
//!
//! A fixed number of slots caps how many units of work are outstanding at
//! once, and a counter of reserved-but-unreleased units acts as a completion
//! barrier. Every reserved unit must be released exactly once, or
//! [`TaskPool::await_idle`] never returns.

use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tracing::warn;

/// Default number of concurrently outstanding units
pub const DEFAULT_CAPACITY: usize = 4;

/// Capacity-limited pool with a completion barrier
///
/// Cloning is cheap; clones share slots and the outstanding counter.
#[derive(Clone, Debug)]
pub struct TaskPool {
    inner: Arc<PoolInner>,
}

#[derive(Debug)]
struct PoolInner {
    capacity: usize,
    slots: Semaphore,
    outstanding: watch::Sender<usize>,
}

impl TaskPool {
    /// Create a pool; a capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (outstanding, _) = watch::channel(0);
        Self {
            inner: Arc::new(PoolInner {
                capacity,
                slots: Semaphore::new(capacity),
                outstanding,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Units reserved and not yet released
    pub fn outstanding(&self) -> usize {
        *self.inner.outstanding.borrow()
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.inner.slots.available_permits()
    }

    /// Adjust reserved work by `delta`
    ///
    /// A positive `delta` waits until that many slots are free, then marks
    /// them outstanding. A negative `delta` hands back at most that many
    /// outstanding slots without waiting. Reserving more than the capacity
    /// in one call never completes.
    pub async fn reserve(&self, delta: isize) {
        if delta > 0 {
            let count = delta.unsigned_abs();
            let permits = u32::try_from(count).unwrap_or(u32::MAX);
            // The semaphore is never closed, so acquisition only fails if it
            // somehow was; in that case nothing is held and nothing is counted.
            if let Ok(permit) = self.inner.slots.acquire_many(permits).await {
                permit.forget();
                self.inner.outstanding.send_modify(|n| *n += count);
            }
        } else if delta < 0 {
            self.hand_back(delta.unsigned_abs());
        }
    }

    /// Mark one reserved unit finished and free its slot
    pub fn release(&self) {
        self.hand_back(1);
    }

    /// Return up to `count` outstanding slots
    ///
    /// Only slots that are actually outstanding are freed, so free slots
    /// never exceed the capacity.
    fn hand_back(&self, count: usize) {
        let mut freed = 0;
        self.inner.outstanding.send_modify(|n| {
            freed = count.min(*n);
            *n -= freed;
        });
        if freed < count {
            warn!(
                "Task pool asked to free {} slots with only {} outstanding",
                count, freed
            );
        }
        self.inner.slots.add_permits(freed);
    }

    /// Reserve one slot and return a guard that releases it on drop
    pub async fn ticket(&self) -> Ticket {
        self.reserve(1).await;
        Ticket { pool: self.clone() }
    }

    /// Wait until every reserved unit has been released
    pub async fn await_idle(&self) {
        let mut rx = self.inner.outstanding.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// One reserved slot; releases on drop, including unwinding
#[derive(Debug)]
#[must_use = "dropping a ticket immediately releases its slot"]
pub struct Ticket {
    pool: TaskPool,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.pool.release();
    }
}
