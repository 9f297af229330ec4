//! Generic bounded worker pool.
//!
//! A pool owns one bounded queue and a fixed set of workers pulling from it.
//! Items are admitted in FIFO order; with more than one worker, completion
//! order across items is unspecified.

use std::future::Future;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

/// Queue slots per worker when the queue size is derived.
pub const DEFAULT_QUEUE_RATIO: usize = 100;

/// Errors returned by pool lifecycle and enqueue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("worker pool already started")]
    AlreadyStarted,
    #[error("worker pool not started")]
    NotStarted,
    #[error("worker pool stopped")]
    Stopped,
    #[error("enqueue cancelled")]
    Cancelled,
}

impl From<PoolError> for murmur_common::AppError {
    fn from(err: PoolError) -> Self {
        Self::Queue(err.to_string())
    }
}

/// Lifecycle state of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    NotStarted,
    Running,
    Stopped,
}

enum Inner<T> {
    NotStarted,
    Running {
        tx: mpsc::Sender<T>,
        cancel: CancellationToken,
        tasks: JoinSet<()>,
    },
    Stopped,
}

/// Bounded queue serviced by a fixed number of workers.
///
/// Stopping closes the queue, lets workers drain what was already admitted,
/// and waits for them to exit. Each admitted item reaches the handler exactly
/// once; the pool never retries.
pub struct WorkerPool<T> {
    name: &'static str,
    workers: usize,
    queue_size: usize,
    inner: Mutex<Inner<T>>,
    /// Cancelled once the pool is stopped and every worker has exited.
    drained: CancellationToken,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Create a pool in the not-started state.
    ///
    /// `workers <= 0` uses the available parallelism; `queue_size <= 0` uses
    /// `workers * DEFAULT_QUEUE_RATIO`.
    #[must_use]
    pub fn new(name: &'static str, workers: isize, queue_size: isize) -> Self {
        let workers = if workers > 0 {
            workers as usize
        } else {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        };
        let queue_size = if queue_size > 0 {
            queue_size as usize
        } else {
            workers * DEFAULT_QUEUE_RATIO
        };

        Self {
            name,
            workers,
            queue_size,
            inner: Mutex::new(Inner::NotStarted),
            drained: CancellationToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pool name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of workers launched by [`start`](Self::start).
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Capacity of the queue.
    #[must_use]
    pub const fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// Items admitted but not yet picked up by a worker.
    #[must_use]
    pub fn queued(&self) -> usize {
        match &*self.lock() {
            Inner::Running { tx, .. } => tx.max_capacity() - tx.capacity(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> PoolState {
        match &*self.lock() {
            Inner::NotStarted => PoolState::NotStarted,
            Inner::Running { .. } => PoolState::Running,
            Inner::Stopped => PoolState::Stopped,
        }
    }

    /// Allocate the queue and launch the workers.
    ///
    /// Each worker calls `handler` for one item at a time. The token passed
    /// to the handler is cancelled once [`stop`](Self::stop) begins; handlers
    /// should use it to avoid waiting on other pools during shutdown, not to
    /// abandon the item. A panicking handler is logged and the worker moves
    /// on to the next item.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(&self, handler: F) -> Result<(), PoolError>
    where
        F: Fn(CancellationToken, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.lock();
        match &*inner {
            Inner::NotStarted => {}
            Inner::Running { .. } => return Err(PoolError::AlreadyStarted),
            Inner::Stopped => return Err(PoolError::Stopped),
        }

        let (tx, rx) = mpsc::channel(self.queue_size);
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        let handler = Arc::new(handler);
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for worker_id in 0..self.workers {
            tasks.spawn(run_worker(
                self.name,
                worker_id,
                rx.clone(),
                handler.clone(),
                cancel.clone(),
            ));
        }

        *inner = Inner::Running { tx, cancel, tasks };
        info!(
            pool = self.name,
            workers = self.workers,
            queue_size = self.queue_size,
            "Worker pool started"
        );
        Ok(())
    }

    /// Stop the pool and wait for every worker to exit.
    ///
    /// Pending enqueues are released with [`PoolError::Stopped`]; items
    /// already admitted are still processed. Concurrent and repeated calls
    /// all return once the drain has finished. Stopping a pool that never
    /// started leaves it stopped.
    pub async fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lock(), Inner::Stopped);
        let (tx, cancel, mut tasks) = match previous {
            Inner::Running { tx, cancel, tasks } => (tx, cancel, tasks),
            Inner::NotStarted => {
                self.drained.cancel();
                return;
            }
            Inner::Stopped => {
                self.drained.cancelled().await;
                return;
            }
        };

        debug!(pool = self.name, "Stopping worker pool");
        cancel.cancel();
        drop(tx);

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(pool = self.name, error = %e, "Worker task failed");
            }
        }
        self.drained.cancel();
        info!(pool = self.name, "Worker pool stopped");
    }

    /// Append an item to the queue.
    ///
    /// Waits while the queue is full. Returns [`PoolError::Cancelled`] if
    /// `ctx` is cancelled first and [`PoolError::Stopped`] if the pool stops
    /// first; in both cases the item is dropped.
    pub async fn enqueue(&self, ctx: &CancellationToken, item: T) -> Result<(), PoolError> {
        let (tx, cancel) = match &*self.lock() {
            Inner::Running { tx, cancel, .. } => (tx.clone(), cancel.clone()),
            Inner::NotStarted => return Err(PoolError::NotStarted),
            Inner::Stopped => return Err(PoolError::Stopped),
        };

        tokio::select! {
            biased;
            permit = tx.reserve() => match permit {
                Ok(permit) => {
                    permit.send(item);
                    Ok(())
                }
                Err(_) => Err(PoolError::Stopped),
            },
            () = cancel.cancelled() => Err(PoolError::Stopped),
            () = ctx.cancelled() => Err(PoolError::Cancelled),
        }
    }
}

async fn run_worker<T, F, Fut>(
    pool: &'static str,
    worker_id: usize,
    rx: Arc<tokio::sync::Mutex<mpsc::Receiver<T>>>,
    handler: Arc<F>,
    cancel: CancellationToken,
) where
    F: Fn(CancellationToken, T) -> Fut,
    Fut: Future<Output = ()>,
{
    trace!(pool, worker_id, "Worker starting");
    let mut processed: u64 = 0;

    loop {
        // The lock is held only while waiting for the next item.
        let item = rx.lock().await.recv().await;
        let Some(item) = item else {
            break;
        };

        let ctx = cancel.clone();
        let result = AssertUnwindSafe(async { (*handler)(ctx, item).await })
            .catch_unwind()
            .await;
        if let Err(panic) = result {
            error!(
                pool,
                worker_id,
                panic = panic_message(panic.as_ref()),
                "Handler panicked, item dropped"
            );
        }
        processed += 1;
    }

    trace!(pool, worker_id, processed, "Worker finished");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_are_derived_from_non_positive_values() {
        let pool: WorkerPool<()> = WorkerPool::new("test", -1, -1);
        assert!(pool.workers() >= 1);
        assert_eq!(pool.queue_size(), pool.workers() * DEFAULT_QUEUE_RATIO);

        let pool: WorkerPool<()> = WorkerPool::new("test", 3, 0);
        assert_eq!(pool.workers(), 3);
        assert_eq!(pool.queue_size(), 300);

        let pool: WorkerPool<()> = WorkerPool::new("test", 2, 7);
        assert_eq!(pool.queue_size(), 7);
        assert_eq!(pool.state(), PoolState::NotStarted);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[tokio::test]
    async fn test_stop_before_start_is_final() {
        let pool: WorkerPool<u32> = WorkerPool::new("test", 1, 1);
        pool.stop().await;

        assert_eq!(pool.state(), PoolState::Stopped);
        assert_eq!(pool.start(|_, _| async {}), Err(PoolError::Stopped));
        assert_eq!(
            pool.enqueue(&CancellationToken::new(), 1).await,
            Err(PoolError::Stopped)
        );
    }
}
