//! # Registry: the single source of truth for live tasks.
//!
//! The [`Registry`] keeps every piece of mutable loop state behind one lock:
//! the id counter, the id-to-entry map, the pre-loop pending queue, and the
//! scheduler handle of the active invocation (if any). Emptiness is signalled
//! through a [`Notify`], so the controller awaits the drain instead of
//! polling for it.
//!
//! ## State transitions
//! ```text
//! register() while inactive ──► entries[id] = Queued, queue.push(task)
//! register() while active   ──► entries[id] = Scheduled(handle)
//! activate(scheduler)       ──► flush queue in order (skip dead ids),
//!                               install the scheduler
//! cancel(id)                ──► remove entry, cancel handle, maybe signal
//! retire(id)                ──► remove entry once a one-shot has fired
//! try_deactivate()          ──► uninstall the scheduler iff no entries left
//! ```
//!
//! ## Locking rules
//! - The lock is a plain [`std::sync::Mutex`]: every critical section is
//!   short, synchronous, and never invokes callbacks or awaits.
//! - Events are published only after the guard is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::events::{Bus, Event, EventKind};
use crate::tasks::{CallbackRef, HostValue, Task, TaskRef, TimerId};

use super::scheduler::{ScheduledHandle, Scheduler};

/// Bookkeeping for one live task.
pub(crate) enum TimerEntry<V> {
    /// Registered while the loop was inactive; parked until the flush.
    Queued(TaskRef<V>),
    /// Submitted to the scheduler; the handle stops future firings.
    Scheduled(ScheduledHandle),
}

/// Everything the loop mutates, guarded by a single lock.
struct RegistryState<V> {
    /// Next id to hand out. Starts at zero, never reused.
    next_id: u64,
    /// Live tasks. An id is absent exactly when the task is done or cancelled.
    entries: HashMap<TimerId, TimerEntry<V>>,
    /// Registration-ordered tasks waiting for the next loop invocation.
    queue: Vec<TaskRef<V>>,
    /// Present while a loop invocation is draining.
    scheduler: Option<Scheduler<V>>,
}

/// Shared task table plus the drain signal.
pub(crate) struct Registry<V> {
    state: Mutex<RegistryState<V>>,
    emptied: Notify,
    bus: Bus,
}

impl<V: HostValue> Registry<V> {
    pub(crate) fn new(bus: Bus) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                next_id: 0,
                entries: HashMap::new(),
                queue: Vec::new(),
                scheduler: None,
            }),
            emptied: Notify::new(),
            bus,
        }
    }

    /// Allocates the next id, builds the task, and routes it.
    ///
    /// While a loop invocation is active the task goes straight to the
    /// scheduler; otherwise it parks in the pending queue. Publishes
    /// `TimerScheduled` or `TimerQueued` accordingly.
    pub(crate) fn register(
        &self,
        callback: CallbackRef<V>,
        delay_ms: i32,
        args: Vec<V>,
        repeat: bool,
    ) -> TimerId {
        let (id, ev) = {
            let mut guard = self.lock();
            let st = &mut *guard;

            let id = TimerId::from_raw(st.next_id);
            st.next_id += 1;

            let task: TaskRef<V> = Arc::new(if repeat {
                Task::repeating(id, callback, args, delay_ms)
            } else {
                Task::once(id, callback, args, delay_ms)
            });

            let ev = match &st.scheduler {
                Some(scheduler) => {
                    let handle = scheduler.submit(Arc::clone(&task));
                    st.entries.insert(id, TimerEntry::Scheduled(handle));
                    lifecycle_event(EventKind::TimerScheduled, &task)
                }
                None => {
                    let ev = lifecycle_event(EventKind::TimerQueued, &task);
                    st.entries.insert(id, TimerEntry::Queued(Arc::clone(&task)));
                    st.queue.push(task);
                    ev
                }
            };
            (id, ev)
        };

        self.bus.publish(ev);
        id
    }

    /// Cancels a live task and publishes `TimerCancelled`.
    ///
    /// Unknown ids are a silent no-op. An invocation already handed to the
    /// dispatch worker is not interrupted, but no further firing happens.
    pub(crate) fn cancel(&self, id: TimerId) {
        let emptied = {
            let mut st = self.lock();
            match st.entries.remove(&id) {
                Some(TimerEntry::Scheduled(handle)) => handle.cancel(),
                // Still sitting in the pending queue; the flush skips ids
                // that no longer have an entry.
                Some(TimerEntry::Queued(_)) => {}
                None => return,
            }
            st.entries.is_empty()
        };

        self.bus.publish(Event::now(EventKind::TimerCancelled).with_timer(id));
        if emptied {
            self.emptied.notify_waiters();
        }
    }

    /// True while the id maps to a live entry.
    pub(crate) fn is_live(&self, id: TimerId) -> bool {
        self.lock().entries.contains_key(&id)
    }

    /// Removes a one-shot entry after its invocation completed.
    ///
    /// Returns `false` if the task was cancelled mid-invocation (the entry
    /// is already gone), in which case no `TimerRetired` should follow.
    pub(crate) fn retire(&self, id: TimerId) -> bool {
        let (removed, emptied) = {
            let mut st = self.lock();
            let removed = st.entries.remove(&id).is_some();
            (removed, removed && st.entries.is_empty())
        };

        if emptied {
            self.emptied.notify_waiters();
        }
        removed
    }

    /// Installs the scheduler for a new loop invocation and flushes the
    /// pending queue in registration order.
    ///
    /// Tasks cancelled while queued have no entry anymore and are skipped.
    /// Returns the flushed count, or the scheduler unchanged when an
    /// invocation is already active.
    pub(crate) fn activate(&self, scheduler: Scheduler<V>) -> Result<usize, Scheduler<V>> {
        let mut events = Vec::new();
        let flushed = {
            let mut guard = self.lock();
            let st = &mut *guard;

            if st.scheduler.is_some() {
                return Err(scheduler);
            }

            let mut flushed = 0;
            for task in st.queue.drain(..) {
                let id = task.id();
                if !st.entries.contains_key(&id) {
                    continue;
                }
                let handle = scheduler.submit(Arc::clone(&task));
                events.push(lifecycle_event(EventKind::TimerScheduled, &task));
                st.entries.insert(id, TimerEntry::Scheduled(handle));
                flushed += 1;
            }
            st.scheduler = Some(scheduler);
            flushed
        };

        for ev in events {
            self.bus.publish(ev);
        }
        Ok(flushed)
    }

    /// Uninstalls the scheduler, but only if the registry is still empty.
    ///
    /// A callback can register a task between the emptiness signal and this
    /// call; returning `None` sends the controller back to waiting instead
    /// of tearing the scheduler down under a live task.
    pub(crate) fn try_deactivate(&self) -> Option<Scheduler<V>> {
        let mut st = self.lock();
        if st.entries.is_empty() {
            st.scheduler.take()
        } else {
            None
        }
    }

    /// Resolves once the registry holds no live entries.
    ///
    /// The waiter is enabled before the emptiness check, so a signal landing
    /// between the check and the await is never lost.
    pub(crate) async fn drained(&self) {
        loop {
            let notified = self.emptied.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.lock().entries.is_empty() {
                return;
            }
            notified.await;
        }
    }

    /// Critical sections never run user code, so a poisoned lock still holds
    /// consistent state and is safe to recover.
    fn lock(&self) -> MutexGuard<'_, RegistryState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds a queued/scheduled event carrying the task's timing metadata.
fn lifecycle_event<V: Send + Sync + 'static>(kind: EventKind, task: &Task<V>) -> Event {
    let mut ev = Event::now(kind)
        .with_timer(task.id())
        .with_delay(task.time_until_start());
    if let Some(period) = task.period() {
        ev = ev.with_period(period);
    }
    ev
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::tasks::CallbackFn;

    #[derive(Clone)]
    struct Val;

    impl HostValue for Val {
        fn as_callback(&self) -> Option<CallbackRef<Val>> {
            None
        }
        fn as_integer(&self) -> Option<i64> {
            None
        }
    }

    fn noop() -> CallbackRef<Val> {
        CallbackFn::arc("noop", |_args: &[Val]| Ok(()))
    }

    fn registry() -> Registry<Val> {
        Registry::new(Bus::new(8))
    }

    #[test]
    fn test_ids_start_at_zero_and_increase() {
        let reg = registry();
        assert_eq!(reg.register(noop(), 0, Vec::new(), false).as_u64(), 0);
        assert_eq!(reg.register(noop(), 5, Vec::new(), true).as_u64(), 1);
        assert_eq!(reg.register(noop(), -3, Vec::new(), false).as_u64(), 2);
    }

    #[test]
    fn test_cancel_unknown_id_is_silent() {
        let reg = registry();
        reg.cancel(TimerId::from_raw(42));
    }

    #[test]
    fn test_cancel_removes_queued_entry() {
        let reg = registry();
        let id = reg.register(noop(), 10, Vec::new(), false);
        assert!(reg.is_live(id));

        reg.cancel(id);
        assert!(!reg.is_live(id));
        reg.cancel(id); // repeated cancels stay silent
    }

    #[test]
    fn test_retire_reports_whether_entry_was_present() {
        let reg = registry();
        let id = reg.register(noop(), 0, Vec::new(), false);
        assert!(reg.retire(id));
        assert!(!reg.retire(id), "second retire must observe the removal");
    }

    #[tokio::test]
    async fn test_drained_resolves_immediately_when_empty() {
        let reg = registry();
        tokio::time::timeout(Duration::from_millis(100), reg.drained())
            .await
            .expect("an empty registry drains immediately");
    }

    #[tokio::test]
    async fn test_drained_resolves_once_entries_are_gone() {
        let reg = Arc::new(registry());
        let id = reg.register(noop(), 0, Vec::new(), false);

        let waiter = {
            let reg = Arc::clone(&reg);
            tokio::spawn(async move { reg.drained().await })
        };
        tokio::task::yield_now().await;
        reg.cancel(id);

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("drained must resolve after the last entry is removed")
            .expect("waiter task must not panic");
    }
}
