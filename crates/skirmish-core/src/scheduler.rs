//! Tick-aligned deferred and repeating tasks.
//!
//! Everything in the engine runs on the tick thread, so "later" always
//! means "on a later tick". Tasks are plain `FnMut` callbacks over the
//! owner's context type; they run after the phase updates of the tick
//! they come due on, in the order they were scheduled. A [`TaskHandle`]
//! cancels through a shared flag, so a callback can cancel itself or a
//! sibling while the scheduler is mid-drain.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::time::{TimeError, TimeValue};

/// Cancellation handle for a scheduled task.
///
/// Cancelling is idempotent and takes effect before the task's next run.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    /// Prevent all future runs of the task.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// The scheduler-assigned task ID.
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// A task taken out of the scheduler for execution.
pub struct ScheduledTask<C> {
    id: u64,
    due: u64,
    interval: Option<u64>,
    cancelled: Arc<AtomicBool>,
    callback: Box<dyn FnMut(&mut C) + Send>,
}

impl<C> core::fmt::Debug for ScheduledTask<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("id", &self.id)
            .field("due", &self.due)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<C> ScheduledTask<C> {
    /// Run the callback against the owner's context.
    pub fn run(&mut self, ctx: &mut C) {
        (self.callback)(ctx);
    }

    /// Whether the task was cancelled through its handle.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Whether the task reschedules itself after running.
    pub const fn is_repeating(&self) -> bool {
        self.interval.is_some()
    }
}

/// Deferred-task queue keyed to the owner's tick counter.
///
/// The owner drives it in three steps per tick: [`advance`] to move the
/// clock and collect due tasks, [`ScheduledTask::run`] on each, and
/// [`reschedule`] for repeating tasks that should keep running.
///
/// [`advance`]: TickScheduler::advance
/// [`reschedule`]: TickScheduler::reschedule
pub struct TickScheduler<C> {
    now: u64,
    next_id: u64,
    tasks: Vec<ScheduledTask<C>>,
}

impl<C> core::fmt::Debug for TickScheduler<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickScheduler")
            .field("now", &self.now)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl<C> Default for TickScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TickScheduler<C> {
    /// Create an empty scheduler at tick zero.
    pub const fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// The scheduler's current tick.
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Number of tasks waiting to come due.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Schedule a one-shot task. A zero delay runs it on the next tick,
    /// never within the current one.
    pub fn run_once<F>(&mut self, delay: TimeValue, callback: F) -> TaskHandle
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        let due = self.now.saturating_add(delay.to_ticks());
        self.push(due, None, Box::new(callback))
    }

    /// Schedule a repeating task with a fixed tick interval.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::ZeroInterval`] for an interval under one
    /// tick, which would otherwise run every tick forever.
    pub fn run_repeating<F>(
        &mut self,
        interval: TimeValue,
        callback: F,
    ) -> Result<TaskHandle, TimeError>
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        let ticks = interval.to_ticks();
        if ticks == 0 {
            return Err(TimeError::ZeroInterval);
        }
        let due = self.now.saturating_add(ticks);
        Ok(self.push(due, Some(ticks), Box::new(callback)))
    }

    /// Advance the clock by one tick and take out every task that is now
    /// due, oldest first. Cancelled tasks are dropped on the way out.
    pub fn advance(&mut self) -> Vec<ScheduledTask<C>> {
        self.now = self.now.saturating_add(1);
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            if task.is_cancelled() {
                continue;
            }
            if task.due <= self.now {
                due.push(task);
            } else {
                pending.push(task);
            }
        }
        self.tasks = pending;
        due
    }

    /// Put a repeating task back in the queue for its next interval.
    /// One-shot and cancelled tasks are dropped instead.
    pub fn reschedule(&mut self, mut task: ScheduledTask<C>) {
        if task.is_cancelled() {
            return;
        }
        if let Some(interval) = task.interval {
            task.due = self.now.saturating_add(interval);
            self.tasks.push(task);
        }
    }

    fn push(
        &mut self,
        due: u64,
        interval: Option<u64>,
        callback: Box<dyn FnMut(&mut C) + Send>,
    ) -> TaskHandle {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.tasks.push(ScheduledTask {
            id,
            due,
            interval,
            cancelled: Arc::clone(&cancelled),
            callback,
        });
        TaskHandle { id, cancelled }
    }
}
