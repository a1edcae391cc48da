//! Serial request scheduler for market data providers.
//!
//! Every outbound provider call is wrapped in a task and pushed onto one FIFO
//! queue. A single drain loop runs the tasks one at a time and keeps the start
//! of consecutive dispatches at least `min_delay` apart. The loop is spawned
//! when work arrives on an idle limiter and exits as soon as the queue is empty.
//!
//! The delay is measured from the previous dispatch start, not its
//! completion, so a slow request does not push the next one further out.

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, warn};
use tokio::sync::oneshot;
use tokio::time::{sleep_until, Instant};

use crate::errors::MarketDataError;
use crate::provider::{RateLimit, DEFAULT_MIN_DELAY};

type Job = BoxFuture<'static, ()>;

#[derive(Default)]
struct State {
    /// Tasks waiting for their dispatch slot, oldest first.
    queue: VecDeque<Job>,
    /// Whether a drain loop currently owns the queue.
    draining: bool,
    /// Start of the most recent dispatch.
    last_dispatch: Option<Instant>,
    dispatched: u64,
}

struct Shared {
    state: Mutex<State>,
    min_delay: Duration,
}

impl Shared {
    /// Lock the scheduler state, recovering from poison if necessary.
    ///
    /// Jobs never run while the lock is held, so a poisoned lock can only come
    /// from a panic in the bookkeeping itself and the state is still usable.
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter state mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Serial rate limiter shared by every fetch call site.
///
/// Cloning is cheap and every clone feeds the same queue, so build one at
/// startup and hand clones to the services that talk to the provider.
#[derive(Clone)]
pub struct RateLimiter {
    shared: Arc<Shared>,
}

impl RateLimiter {
    /// Create a limiter that spaces dispatches by at least `min_delay`.
    pub fn new(min_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                min_delay,
            }),
        }
    }

    /// Create a limiter from a provider's advertised limits.
    pub fn from_rate_limit(limit: &RateLimit) -> Self {
        Self::new(limit.min_delay)
    }

    /// Enqueue a task and return a handle that resolves with its outcome.
    ///
    /// The task is not started until the drain loop reaches it. Its error, or
    /// a panic while it runs, only affects the returned handle.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime: the drain loop is spawned
    /// from this call when the limiter is idle.
    pub fn schedule<T, F, Fut>(&self, task: F) -> ScheduledTask<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, MarketDataError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let job = async move {
            let outcome = AssertUnwindSafe(async move { task().await })
                .catch_unwind()
                .await;
            let result = outcome.unwrap_or_else(|_| {
                warn!("Rate limited task panicked");
                Err(MarketDataError::TaskPanicked)
            });
            // The caller may have dropped its handle; the task still ran.
            let _ = tx.send(result);
        }
        .boxed();

        let start_loop = {
            let mut state = self.shared.lock_state();
            state.queue.push_back(job);
            if state.draining {
                false
            } else {
                state.draining = true;
                true
            }
        };

        if start_loop {
            debug!("Rate limiter: starting drain loop");
            tokio::spawn(drain(Arc::clone(&self.shared)));
        }

        ScheduledTask { rx }
    }

    /// Number of tasks waiting for their dispatch slot.
    pub fn pending(&self) -> usize {
        self.shared.lock_state().queue.len()
    }

    /// Number of tasks dispatched since the limiter was created.
    pub fn dispatched(&self) -> u64 {
        self.shared.lock_state().dispatched
    }

    pub fn min_delay(&self) -> Duration {
        self.shared.min_delay
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY)
    }
}

async fn drain(shared: Arc<Shared>) {
    loop {
        let ready_at = {
            let mut state = shared.lock_state();
            if state.queue.is_empty() {
                state.draining = false;
                debug!("Rate limiter: queue drained, loop going idle");
                return;
            }
            state.last_dispatch.map(|last| last + shared.min_delay)
        };

        if let Some(ready_at) = ready_at {
            if ready_at > Instant::now() {
                debug!(
                    "Rate limiter: waiting {:?} before next dispatch",
                    ready_at - Instant::now()
                );
                sleep_until(ready_at).await;
            }
        }

        let job = {
            let mut state = shared.lock_state();
            state.last_dispatch = Some(Instant::now());
            state.dispatched += 1;
            state.queue.pop_front()
        };

        if let Some(job) = job {
            job.await;
        }
    }
}

/// Handle to a task queued on a [`RateLimiter`].
///
/// Resolves with the task's own result, or [`MarketDataError::SchedulerClosed`]
/// if the runtime dropped the task before it finished.
#[must_use = "a scheduled task still runs when dropped, but its result is lost"]
pub struct ScheduledTask<T> {
    rx: oneshot::Receiver<Result<T, MarketDataError>>,
}

impl<T> Future for ScheduledTask<T> {
    type Output = Result<T, MarketDataError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(MarketDataError::SchedulerClosed)))
    }
}
