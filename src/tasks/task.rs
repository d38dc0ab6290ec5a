//! # One registered unit of deferred work.
//!
//! `Task` bundles what registration captured: identity, the callback
//! capability, the extra arguments, the absolute start time, and the repeat
//! period. Firing is encapsulated here: [`Task::fire`] calls the capability
//! with the captured arguments.
//!
//! ## Rules
//! - `scheduled_start` is fixed at registration: now + requested delay. A
//!   task parked in the pending queue keeps it, so the effective delay at
//!   submission shrinks by however long the task waited.
//! - `period = None` means one-shot; `Some(p)` repeats at fixed rate.
//! - Tasks are immutable once built; lifecycle state (queued / scheduled /
//!   gone) lives in the registry, not here.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::CallbackError;
use crate::tasks::callback::CallbackRef;
use crate::tasks::id::TimerId;

/// Minimum repeat period. A zero period would make the underlying ticker
/// panic, and sub-millisecond periods are below timer granularity anyway.
pub(crate) const MIN_PERIOD: Duration = Duration::from_millis(1);

/// One registered deferred or repeating unit of callback work.
pub(crate) struct Task<V> {
    id: TimerId,
    callback: CallbackRef<V>,
    args: Vec<V>,
    scheduled_start: Instant,
    period: Option<Duration>,
}

/// Shared handle to a task (`Arc<Task<V>>`).
///
/// The registry's pending queue, the timer future, and firings in the
/// dispatch lane all hold the same allocation.
pub(crate) type TaskRef<V> = Arc<Task<V>>;

impl<V: Send + Sync + 'static> Task<V> {
    /// Builds a one-shot task due `delay_ms` from now.
    ///
    /// Negative delays are due immediately.
    pub(crate) fn once(id: TimerId, callback: CallbackRef<V>, args: Vec<V>, delay_ms: i32) -> Self {
        Self {
            id,
            callback,
            args,
            scheduled_start: start_after(delay_ms),
            period: None,
        }
    }

    /// Builds a repeating task; the interval doubles as the initial delay.
    ///
    /// The period is clamped to [`MIN_PERIOD`].
    pub(crate) fn repeating(
        id: TimerId,
        callback: CallbackRef<V>,
        args: Vec<V>,
        interval_ms: i32,
    ) -> Self {
        let period = Duration::from_millis(interval_ms.max(0) as u64).max(MIN_PERIOD);
        Self {
            id,
            callback,
            args,
            scheduled_start: start_after(interval_ms),
            period: Some(period),
        }
    }

    /// Task identity.
    pub(crate) fn id(&self) -> TimerId {
        self.id
    }

    /// Repeat period; `None` for one-shot tasks.
    pub(crate) fn period(&self) -> Option<Duration> {
        self.period
    }

    /// True when this task fires at most once.
    pub(crate) fn is_one_shot(&self) -> bool {
        self.period.is_none()
    }

    /// Callback name, for events and logs.
    pub(crate) fn callback_name(&self) -> &str {
        self.callback.name()
    }

    /// Time remaining until the task is eligible to fire; zero if overdue.
    ///
    /// This is the effective delay handed to the scheduler at submission.
    pub(crate) fn time_until_start(&self) -> Duration {
        self.scheduled_start.saturating_duration_since(Instant::now())
    }

    /// Invokes the callback with the captured arguments.
    pub(crate) async fn fire(&self) -> Result<(), CallbackError> {
        self.callback.invoke(&self.args).await
    }
}

fn start_after(delay_ms: i32) -> Instant {
    Instant::now() + Duration::from_millis(delay_ms.max(0) as u64)
}
