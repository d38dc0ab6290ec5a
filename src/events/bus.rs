//! # Broadcast bus for loop events.
//!
//! [`Bus`] gives the registry, the dispatch worker, and the run-loop
//! controller one shared, never-blocking publishing surface over
//! [`tokio::sync::broadcast`].
//!
//! ## Architecture
//! ```text
//! Publishers (many):                    Subscriber (one):
//!   Registry ───────┐
//!   Dispatch worker ┼──────► Bus ───────► listener pump ────► SubscriberSet
//!   Controller ─────┘  (broadcast chan)   (spawned at build)
//! ```
//!
//! When subscribers are attached, the builder spawns a single listener that
//! lives for the lifetime of the loop and fans events out to user subscribers
//! via [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Rules
//! - Publishing never blocks and never fails; it is a plain
//!   `broadcast::Sender::send`.
//! - One bounded ring buffer serves all receivers; a receiver that falls
//!   behind by more than the capacity sees `RecvError::Lagged(n)` and skips
//!   the `n` oldest items.
//! - Nothing is persisted: events published with no receiver attached are
//!   gone, so a loop built without subscribers publishes into the void.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for loop events.
///
/// Wraps a [`tokio::sync::broadcast`] sender; clones share the same channel,
/// which is how the registry, the dispatch worker, and the controller all
/// publish into one stream. Each receiver gets its own clone of every event.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus whose ring buffer holds `capacity` events (min 1).
    ///
    /// The buffer is shared across receivers; one that falls more than
    /// `capacity` events behind observes `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to whoever is currently listening.
    ///
    /// Never blocks and never fails: with no receivers the event just
    /// disappears, per the no-persistence rule above.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Opens an independent receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
