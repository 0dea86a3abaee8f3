//! Coalescing schedulers: "run this once, on the next tick".
//!
//! The store asks for at most one pending flush at a time. A scheduler
//! decides what a tick is: a timer interval, a render frame, or an explicit
//! call from the host.

use crate::errors::PainflowError;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Work handed to a scheduler.
pub type FlushTask = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled task.
pub trait ScheduledFlush: Send {
    /// Prevents the task from running. No effect once it has run.
    fn cancel(&self);
}

/// Runs a task once on the next tick.
///
/// Implementations must never run the task inline from `schedule`: the
/// caller may hold locks the task needs.
pub trait CoalescingScheduler: Send + Sync {
    /// Schedules `task` for the next tick.
    fn schedule(&self, task: FlushTask) -> Box<dyn ScheduledFlush>;
}

impl<S: CoalescingScheduler + ?Sized> CoalescingScheduler for Arc<S> {
    fn schedule(&self, task: FlushTask) -> Box<dyn ScheduledFlush> {
        (**self).schedule(task)
    }
}

/// Ticks on a fixed timer interval on a tokio runtime.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    handle: Handle,
    interval: Duration,
}

impl IntervalScheduler {
    /// Default tick, one frame at 60 Hz.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

    /// Creates a scheduler on the current tokio runtime.
    pub fn new(interval: Duration) -> Result<Self, PainflowError> {
        let handle = Handle::try_current()
            .map_err(|e| PainflowError::Runtime(format!("interval scheduler needs a tokio runtime: {e}")))?;
        Ok(Self::with_handle(handle, interval))
    }

    /// Creates a scheduler on an explicit runtime.
    #[must_use]
    pub fn with_handle(handle: Handle, interval: Duration) -> Self {
        Self { handle, interval }
    }

    /// The tick interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

struct TimerFlush(JoinHandle<()>);

impl ScheduledFlush for TimerFlush {
    fn cancel(&self) {
        self.0.abort();
    }
}

impl CoalescingScheduler for IntervalScheduler {
    fn schedule(&self, task: FlushTask) -> Box<dyn ScheduledFlush> {
        let interval = self.interval;
        let join = self.handle.spawn(async move {
            tokio::time::sleep(interval).await;
            task();
        });
        Box::new(TimerFlush(join))
    }
}

#[derive(Default)]
struct ManualQueue {
    next_id: u64,
    tasks: Vec<(u64, FlushTask)>,
}

/// Ticks only when the host calls [`ManualScheduler::tick`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every task scheduled before this call. Tasks scheduled while
    /// ticking wait for the next tick. Returns how many ran.
    pub fn tick(&self) -> usize {
        let tasks = std::mem::take(&mut self.queue.lock().tasks);
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }

    /// Number of tasks waiting for a tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().tasks.len()
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

struct ManualFlush {
    id: u64,
    queue: Weak<Mutex<ManualQueue>>,
}

impl ScheduledFlush for ManualFlush {
    fn cancel(&self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.lock().tasks.retain(|(id, _)| *id != self.id);
        }
    }
}

impl CoalescingScheduler for ManualScheduler {
    fn schedule(&self, task: FlushTask) -> Box<dyn ScheduledFlush> {
        let mut queue = self.queue.lock();
        queue.next_id += 1;
        let id = queue.next_id;
        queue.tasks.push((id, task));
        Box::new(ManualFlush {
            id,
            queue: Arc::downgrade(&self.queue),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_task(counter: &Arc<AtomicUsize>) -> FlushTask {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_tick_runs_scheduled_tasks() {
        let scheduler = ManualScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let _a = scheduler.schedule(counter_task(&runs));
        let _b = scheduler.schedule(counter_task(&runs));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 2);

        assert_eq!(scheduler.tick(), 2);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.tick(), 0);
    }

    #[test]
    fn test_manual_cancel() {
        let scheduler = ManualScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule(counter_task(&runs));
        handle.cancel();
        handle.cancel();

        assert_eq!(scheduler.tick(), 0);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_task_scheduled_during_tick_waits() {
        let scheduler = ManualScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let inner = scheduler.clone();
        let r = runs.clone();
        let _h = scheduler.schedule(Box::new(move || {
            let _next = inner.schedule(counter_task(&r));
        }));

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.tick(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interval_scheduler_needs_runtime() {
        let err = IntervalScheduler::new(IntervalScheduler::DEFAULT_INTERVAL).unwrap_err();
        assert!(matches!(err, PainflowError::Runtime(_)));
    }

    #[tokio::test]
    async fn test_interval_scheduler_runs_after_interval() {
        let scheduler = IntervalScheduler::new(Duration::from_millis(5)).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let _h = scheduler.schedule(counter_task(&runs));
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_interval_scheduler_cancel() {
        let scheduler = IntervalScheduler::new(Duration::from_millis(5)).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule(counter_task(&runs));
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
