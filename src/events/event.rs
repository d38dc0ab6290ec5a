//! # Events emitted by the timer loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Timer lifecycle**: registration, scheduling, firing, retirement,
//!   cancellation
//! - **Failures**: callback errors and panics (severe)
//! - **Loop lifecycle**: drain start/finish and shutdown anomalies
//!
//! The [`Event`] struct carries metadata such as timestamps, the timer id,
//! the callback name, requested delays, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use timerloop::{Event, EventKind, TimerId};
//!
//! let ev = Event::now(EventKind::TimerScheduled)
//!     .with_timer(TimerId::from_raw(3))
//!     .with_delay(Duration::from_millis(50));
//!
//! assert_eq!(ev.kind, EventKind::TimerScheduled);
//! assert_eq!(ev.delay_ms, Some(50));
//! assert!(!ev.kind.is_severe());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::tasks::TimerId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of timer loop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Timer lifecycle events ===
    /// Task registered while the loop was inactive; parked in the pending
    /// queue until the loop starts.
    ///
    /// Sets:
    /// - `timer`: task id
    /// - `delay_ms`: requested delay
    /// - `period_ms`: repeat period (repeating tasks only)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimerQueued,

    /// Task submitted to the scheduler (either at registration while the
    /// loop was active, or during the pending-queue flush).
    ///
    /// Sets:
    /// - `timer`: task id
    /// - `delay_ms`: effective delay at submission
    /// - `period_ms`: repeat period (repeating tasks only)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimerScheduled,

    /// A callback invocation completed without error.
    ///
    /// Sets:
    /// - `timer`: task id
    /// - `callback`: callback name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimerFired,

    /// One-shot task finished its single invocation and left the registry.
    ///
    /// Sets:
    /// - `timer`: task id
    /// - `callback`: callback name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimerRetired,

    /// Task removed by an explicit `clear_*` call.
    ///
    /// Sets:
    /// - `timer`: task id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimerCancelled,

    // === Failures ===
    /// A callback raised an error or panicked. Severe; the drain continues.
    ///
    /// Sets:
    /// - `timer`: task id
    /// - `callback`: callback name
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CallbackFailed,

    // === Loop lifecycle events ===
    /// A loop invocation began draining; the pending queue was flushed.
    ///
    /// Sets:
    /// - `pending`: number of tasks flushed from the queue
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    LoopStarted,

    /// The registry became empty; the loop is about to shut the scheduler
    /// down.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    LoopDrained,

    /// Scheduler shutdown did not complete within the grace window. Severe;
    /// `run()` returns anyway.
    ///
    /// Sets:
    /// - `reason`: what stalled
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ShutdownStalled,
}

impl EventKind {
    /// True for kinds that represent diagnostics a host should not ignore.
    #[inline]
    pub fn is_severe(&self) -> bool {
        matches!(self, EventKind::CallbackFailed | EventKind::ShutdownStalled)
    }
}

/// Timer loop event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Task id, if applicable.
    pub timer: Option<TimerId>,
    /// Callback name, if applicable.
    pub callback: Option<Arc<str>>,
    /// Requested or effective delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Repeat period in milliseconds (compact; repeating tasks only).
    pub period_ms: Option<u32>,
    /// Number of tasks flushed from the pending queue (LoopStarted).
    pub pending: Option<usize>,
    /// Human-readable reason (failure messages, stall details).
    pub reason: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind, stamped with the current time
    /// and the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            timer: None,
            callback: None,
            delay_ms: None,
            period_ms: None,
            pending: None,
            reason: None,
            kind,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_timer(mut self, id: TimerId) -> Self {
        self.timer = Some(id);
        self
    }

    /// Attaches a callback name.
    #[inline]
    pub fn with_callback(mut self, name: impl Into<Arc<str>>) -> Self {
        self.callback = Some(name.into());
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a repeat period (stored as milliseconds).
    #[inline]
    pub fn with_period(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.period_ms = Some(ms);
        self
    }

    /// Attaches the flushed pending-queue size.
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a callback failure event (severe).
    #[inline]
    pub fn callback_failed(id: TimerId, callback: &str, reason: impl Into<Arc<str>>) -> Self {
        Event::now(EventKind::CallbackFailed)
            .with_timer(id)
            .with_callback(callback)
            .with_reason(reason)
    }

    /// Creates a shutdown stall event (severe).
    #[inline]
    pub fn shutdown_stalled(reason: impl Into<Arc<str>>) -> Self {
        Event::now(EventKind::ShutdownStalled).with_reason(reason)
    }
}
