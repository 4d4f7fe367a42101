//! One-shot delayed tasks.
//!
//! The page simulates latency in several places (signup submission, chat
//! replies, the cookie banner). All of them go through [`Scheduler`] so that
//! tests can drive a [`ManualScheduler`] on virtual time. Scheduled tasks
//! cannot be cancelled; they simply fire.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay.
pub trait Scheduler {
    /// Run `task` once, `delay` from now.
    fn schedule(&self, delay: Duration, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    fn schedule(&self, delay: Duration, task: Task) {
        (**self).schedule(delay, task);
    }
}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn schedule(&self, delay: Duration, task: Task) {
        (**self).schedule(delay, task);
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Virtual-time scheduler driven explicitly by the caller.
///
/// Tasks fire in due-time order; tasks due at the same instant fire in the
/// order they were scheduled. A task may schedule further tasks, which fire
/// within the same [`advance`](Self::advance) call when they fall due inside
/// the window.
///
/// ```rust
/// use boostly::scheduler::{ManualScheduler, Scheduler};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
/// scheduler.schedule(Duration::from_secs(3), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// scheduler.advance(Duration::from_secs(2));
/// assert!(!fired.load(Ordering::SeqCst));
/// scheduler.advance(Duration::from_secs(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    timeline: Mutex<Timeline>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let timeline = self.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &timeline.now)
            .field("pending", &timeline.pending.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Timeline> {
        self.timeline.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Advance virtual time by `by`, firing every task that falls due.
    ///
    /// Returns the number of tasks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now.saturating_add(by);
        let mut fired = 0;

        loop {
            let task = {
                let mut timeline = self.lock();
                let next = timeline
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let pending = timeline.pending.swap_remove(i);
                        timeline.now = pending.due;
                        pending.task
                    }
                    None => {
                        timeline.now = target;
                        break;
                    }
                }
            };
            // Lock released: the task may schedule more work.
            task();
            fired += 1;
        }

        fired
    }

    /// Fire everything pending, however far in the future.
    ///
    /// Returns the number of tasks fired.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            let furthest = {
                let timeline = self.lock();
                timeline
                    .pending
                    .iter()
                    .map(|p| p.due)
                    .max()
                    .map(|due| due.saturating_sub(timeline.now))
            };
            match furthest {
                Some(by) => fired += self.advance(by),
                None => return fired,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut timeline = self.lock();
        let due = timeline.now.saturating_add(delay);
        let seq = timeline.next_seq;
        timeline.next_seq += 1;
        timeline.pending.push(Pending { due, seq, task });
    }
}

/// Real-time scheduler spawning onto a Tokio runtime.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl TokioScheduler {
    /// Schedule onto the given runtime.
    #[must_use]
    pub const fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Schedule onto the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Other`] outside a Tokio runtime.
    pub fn current() -> crate::Result<Self> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|e| crate::Error::Other(format!("no tokio runtime: {e}")))
    }
}

#[cfg(feature = "tokio")]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
