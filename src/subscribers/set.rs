//! # Non-blocking fan-out to the attached subscribers.
//!
//! [`SubscriberSet`] owns one bounded queue and one worker task per
//! subscriber. [`emit`](SubscriberSet::emit) hands an event to every queue
//! and returns immediately; the workers then drive `on_event` at each
//! subscriber's own pace. The drain protocol never waits on observability.
//!
//! Ordering holds per subscriber (queue FIFO), not across subscribers; use
//! `Event::seq` to reconstruct a global order. Overflowing a queue drops the
//! event for that subscriber alone, with a stderr warning.
//!
//! ```text
//!    emit(Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

/// Queue handle for one subscriber, kept for emit and warnings.
struct Outlet {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
}

/// Fan-out over the attached subscribers.
pub struct SubscriberSet {
    outlets: Vec<Outlet>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber; needs a Tokio runtime context.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut outlets = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
            outlets.push(Outlet { name: sub.name(), tx });
            workers.push(tokio::spawn(deliver(sub, rx)));
        }

        Self { outlets, workers }
    }

    /// Queues the event for every subscriber without awaiting any of them.
    ///
    /// A full or closed queue drops the event for that subscriber and warns
    /// on stderr; the other subscribers still receive it.
    pub fn emit(&self, event: Event) {
        let ev = Arc::new(event);
        for outlet in &self.outlets {
            let dropped = match outlet.tx.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "queue full",
                Err(mpsc::error::TrySendError::Closed(_)) => "worker gone",
            };
            eprintln!("[timerloop] subscriber '{}' dropped event: {dropped}", outlet.name);
        }
    }

    /// Closes every queue and waits for the workers to finish draining.
    pub async fn shutdown(self) {
        drop(self.outlets);
        for worker in self.workers {
            let _ = worker.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outlets.len()
    }
}

/// Worker loop for one subscriber: drain the queue, contain panics.
async fn deliver(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        let handled = std::panic::AssertUnwindSafe(sub.on_event(ev.as_ref()))
            .catch_unwind()
            .await;
        if let Err(panic_err) = handled {
            eprintln!("[timerloop] subscriber '{}' panicked: {panic_err:?}", sub.name());
        }
    }
}
