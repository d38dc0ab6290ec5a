//! # Dispatch worker: serial callback execution.
//!
//! Every firing, from every timer future, funnels into one worker that
//! invokes callbacks strictly one at a time in arrival order. Script hosts
//! are single-threaded; the lane restores that model on top of concurrent
//! timers, so no two callbacks ever observe the host mid-mutation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::events::{Bus, Event, EventKind};
use crate::tasks::{HostValue, TaskRef};

use super::registry::Registry;

/// Receives firings until the lane closes.
///
/// ## Per firing
/// - skip it when the task is no longer live (cancelled after its timer
///   fired but before dispatch);
/// - invoke the callback, catching both returned errors and panics;
/// - publish `TimerFired`, or a severe `CallbackFailed` with the reason;
/// - retire one-shots, which may signal the drain.
///
/// Failures never stop the worker: a failed one-shot still retires, and a
/// failed repeating task keeps its schedule until cancelled.
pub(crate) async fn dispatch<V: HostValue>(
    mut fire_rx: mpsc::UnboundedReceiver<TaskRef<V>>,
    registry: Arc<Registry<V>>,
    bus: Bus,
) {
    while let Some(task) = fire_rx.recv().await {
        let id = task.id();
        if !registry.is_live(id) {
            continue;
        }

        match AssertUnwindSafe(task.fire()).catch_unwind().await {
            Ok(Ok(())) => {
                bus.publish(
                    Event::now(EventKind::TimerFired)
                        .with_timer(id)
                        .with_callback(task.callback_name()),
                );
            }
            Ok(Err(err)) => {
                bus.publish(Event::callback_failed(id, task.callback_name(), err.as_message()));
            }
            Err(_) => {
                bus.publish(Event::callback_failed(id, task.callback_name(), "callback panicked"));
            }
        }

        if task.is_one_shot() && registry.retire(id) {
            bus.publish(
                Event::now(EventKind::TimerRetired)
                    .with_timer(id)
                    .with_callback(task.callback_name()),
            );
        }
    }
}
