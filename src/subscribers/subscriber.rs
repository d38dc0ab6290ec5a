//! # The subscriber extension point.
//!
//! [`Subscribe`] is the hook for observing the timer loop from outside:
//! loggers, metrics exporters, and test recorders all attach through it.
//!
//! Delivery is deliberately decoupled from the drain. A callback firing on
//! the dispatch lane publishes its events and moves on; each subscriber
//! consumes them from its own bounded queue on its own worker task. A slow
//! or panicking subscriber therefore cannot delay a firing, stall the drain,
//! or starve another subscriber. The price is best-effort delivery: when a
//! subscriber's queue is full, new events are dropped for that subscriber
//! (with a stderr warning) rather than buffered without bound.
//!
//! ```text
//! listener ── emit ──► [bounded queue] ──► worker ──► subscriber.on_event()
//!                                       └─► panic caught → warning on stderr
//! ```
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use timerloop::{Event, EventKind, Subscribe};
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::CallbackFailed) {
//!             // increment a failure metric, page someone, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failures" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer attached to the loop's event stream.
///
/// Implementations run isolated from the loop and from each other: one
/// bounded queue and one worker task per subscriber, FIFO within the queue,
/// panics caught at the worker. Keep `on_event` non-blocking (async I/O
/// only) and handle failures internally; there is no retry path for a
/// dropped or mishandled event.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    ///
    /// Runs on this subscriber's worker task, never on the publisher's, so
    /// taking time here delays only this subscriber's own queue.
    async fn on_event(&self, event: &Event);

    /// Name shown in overflow and panic warnings.
    ///
    /// Short and descriptive ("log", "metrics", "audit"). Defaults to
    /// `type_name::<Self>()`, which works but reads poorly in warnings.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's event queue (clamped to at least 1).
    ///
    /// When the queue is full the newest event is dropped for this
    /// subscriber only and a warning naming it goes to stderr. Size it for
    /// the burstiest stretch of a drain; the default of 1024 comfortably
    /// covers short-lived loops.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
