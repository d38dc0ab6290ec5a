//! # Scheduler: timer futures and the dispatch lane lifecycle.
//!
//! A [`Scheduler`] exists only while a loop invocation is draining. It owns
//! the sending side of the dispatch lane (an unbounded channel into the
//! dispatch worker) and a parent [`CancellationToken`]; every submitted task
//! gets a timer future holding a child token.
//!
//! ```text
//! submit(task)
//!   └─► timer future ──── firings ────► lane ──► executor::dispatch
//!       (sleep / interval_at)                     (one worker, serial)
//! ```
//!
//! Timer futures decide *when* a task fires and nothing else; callbacks are
//! invoked exclusively by the dispatch worker, in lane order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::ShutdownError;
use crate::events::Bus;
use crate::tasks::{HostValue, TaskRef};

use super::executor;
use super::registry::Registry;

/// Cancellation handle for one scheduled task's timer future.
pub(crate) struct ScheduledHandle {
    cancel: CancellationToken,
}

impl ScheduledHandle {
    /// Stops future firings. An invocation already dispatched is unaffected.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Timing machinery for one loop invocation.
pub(crate) struct Scheduler<V> {
    fire_tx: mpsc::UnboundedSender<TaskRef<V>>,
    token: CancellationToken,
    worker: JoinHandle<()>,
}

impl<V: HostValue> Scheduler<V> {
    /// Spawns the dispatch worker. Must be called within a Tokio runtime.
    pub(crate) fn start(registry: Arc<Registry<V>>, bus: Bus) -> Self {
        let (fire_tx, fire_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(executor::dispatch(fire_rx, registry, bus));
        Self {
            fire_tx,
            token: CancellationToken::new(),
            worker,
        }
    }

    /// Spawns the timer future for a task and returns its cancel handle.
    pub(crate) fn submit(&self, task: TaskRef<V>) -> ScheduledHandle {
        let cancel = self.token.child_token();
        tokio::spawn(drive(task, self.fire_tx.clone(), cancel.clone()));
        ScheduledHandle { cancel }
    }

    /// Cancels every timer future, closes the lane, and joins the dispatch
    /// worker within `grace`.
    pub(crate) async fn shutdown(self, grace: Duration) -> Result<(), ShutdownError> {
        self.token.cancel();
        drop(self.fire_tx);

        match time::timeout(grace, self.worker).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(join_err)) => Err(ShutdownError::JoinFailed {
                detail: join_err.to_string(),
            }),
            Err(_) => Err(ShutdownError::GraceExceeded { grace }),
        }
    }
}

/// Waits out the task's effective delay, then feeds firings into the lane.
///
/// One-shot tasks send exactly once. Repeating tasks send on every tick at a
/// fixed rate, so missed ticks burst to catch up with the wall clock. Exits
/// when the child token is cancelled or the lane closes.
async fn drive<V: HostValue>(
    task: TaskRef<V>,
    fire_tx: mpsc::UnboundedSender<TaskRef<V>>,
    cancel: CancellationToken,
) {
    let initial = task.time_until_start();

    match task.period() {
        None => {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = time::sleep(initial) => {
                    let _ = fire_tx.send(task);
                }
            }
        }
        Some(period) => {
            let mut ticks = time::interval_at(Instant::now() + initial, period);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticks.tick() => {
                        if fire_tx.send(Arc::clone(&task)).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
}
