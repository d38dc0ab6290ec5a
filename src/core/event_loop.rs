//! # TimerLoop: the host-facing timer surface.
//!
//! [`TimerLoop`] exposes the classic script timer namespace, `set_timeout`,
//! `set_interval`, `set_immediate` and the matching `clear_*` calls, plus
//! [`TimerLoop::run`], which drains every registered task to completion.
//!
//! ## Control flow
//! ```text
//! set_timeout(args) ──► parse ──► Registry::register ──┬─ inactive: pending queue
//!                                                      └─ active:   Scheduler::submit
//!
//! run():
//!   Scheduler::start ──► Registry::activate (flush queue, install)
//!        │
//!        ├─► timer futures ── firings ──► lane ──► dispatch worker ──► callbacks
//!        │                                              │
//!        │                      registry emptied ◄── retire one-shots
//!        │                            │
//!   drained() resolves ──► try_deactivate ──► Scheduler::shutdown(grace)
//! ```
//!
//! Registration is synchronous and never blocks; `run()` is the only
//! long-lived future. Events flow to the bus throughout and a listener
//! spawned at build time fans them out to subscribers.

use std::sync::Arc;

use crate::config::LoopConfig;
use crate::error::RegisterError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{CallbackRef, HostValue, TimerId};

use super::builder::TimerLoopBuilder;
use super::registry::Registry;
use super::scheduler::Scheduler;

/// Blocking timer event loop for a script host.
///
/// The loop is generic over the host's value type `V`: registration
/// receives the raw argument slice a script call produced, and the
/// [`HostValue`] impl decides what counts as an invokable callback and as
/// an integer delay. Everything after the first two arguments is captured
/// and handed back to the callback on every invocation.
///
/// A single instance is reusable: tasks registered while no invocation is
/// active are queued for the next [`run`](TimerLoop::run), and ids keep
/// increasing across invocations.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use timerloop::{CallbackFn, CallbackRef, HostValue, LoopConfig, TimerLoop};
///
/// #[derive(Clone)]
/// enum Value {
///     Int(i64),
///     Func(CallbackRef<Value>),
/// }
/// # impl HostValue for Value {
/// #     fn as_callback(&self) -> Option<CallbackRef<Value>> {
/// #         match self { Value::Func(f) => Some(Arc::clone(f)), _ => None }
/// #     }
/// #     fn as_integer(&self) -> Option<i64> {
/// #         match self { Value::Int(n) => Some(*n), _ => None }
/// #     }
/// # }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let lp: Arc<TimerLoop<Value>> = TimerLoop::new(LoopConfig::default());
///
///     let greet = Value::Func(CallbackFn::arc("greet", |_args: &[Value]| {
///         println!("hello from a timer");
///         Ok(())
///     }));
///     lp.set_timeout(&[greet, Value::Int(25)]).expect("valid registration");
///
///     lp.run().await; // resolves once every task has finished
/// }
/// ```
pub struct TimerLoop<V: HostValue> {
    cfg: LoopConfig,
    bus: Bus,
    registry: Arc<Registry<V>>,
}

impl<V: HostValue> TimerLoop<V> {
    /// Starts building a loop with the given configuration.
    pub fn builder(cfg: LoopConfig) -> TimerLoopBuilder<V> {
        TimerLoopBuilder::new(cfg)
    }

    /// Creates a loop with default wiring and no subscribers.
    pub fn new(cfg: LoopConfig) -> Arc<Self> {
        Self::builder(cfg).build()
    }

    pub(crate) fn assemble(cfg: LoopConfig, bus: Bus, registry: Arc<Registry<V>>) -> Self {
        Self { cfg, bus, registry }
    }

    /// Registers a one-shot task and returns its id.
    ///
    /// `args[0]` must be invokable and `args[1]` an integer delay in
    /// milliseconds; anything after is captured and passed to the callback.
    /// Negative delays are clamped to zero, delays outside 32 bits are
    /// rejected as [`RegisterError::InvalidDelay`].
    ///
    /// Before [`run`](TimerLoop::run) registration only queues and needs no
    /// Tokio context. While an invocation is draining it hands the task
    /// straight to the scheduler, so it must be called within the loop's
    /// runtime; callbacks satisfy that automatically.
    pub fn set_timeout(&self, args: &[V]) -> Result<TimerId, RegisterError> {
        let (callback, delay_ms, extra) = parse_registration(args)?;
        Ok(self.registry.register(callback, delay_ms, extra, false))
    }

    /// Registers a repeating task and returns its id.
    ///
    /// The interval doubles as the initial delay: the first firing happens
    /// one full period after registration. The task repeats until cleared;
    /// an uncleared interval keeps [`run`](TimerLoop::run) from resolving.
    /// Runtime-context rules are those of [`set_timeout`](TimerLoop::set_timeout).
    pub fn set_interval(&self, args: &[V]) -> Result<TimerId, RegisterError> {
        let (callback, interval_ms, extra) = parse_registration(args)?;
        Ok(self.registry.register(callback, interval_ms, extra, true))
    }

    /// Registers a zero-delay one-shot task.
    ///
    /// Called with no arguments this returns `Ok(None)`, the undefined
    /// sentinel, without touching the registry. A first argument that is
    /// not invokable still fails with [`RegisterError::NotInvokable`].
    /// Runtime-context rules are those of [`set_timeout`](TimerLoop::set_timeout).
    pub fn set_immediate(&self, args: &[V]) -> Result<Option<TimerId>, RegisterError> {
        let Some(first) = args.first() else {
            return Ok(None);
        };
        let callback = first.as_callback().ok_or(RegisterError::NotInvokable)?;
        let extra = args[1..].to_vec();
        Ok(Some(self.registry.register(callback, 0, extra, false)))
    }

    /// Cancels a one-shot task. Unknown ids are a silent no-op.
    pub fn clear_timeout(&self, id: TimerId) {
        self.registry.cancel(id);
    }

    /// Cancels a repeating task. Unknown ids are a silent no-op.
    ///
    /// The three `clear_*` methods are one operation under different names,
    /// mirroring the web-platform contract where the namespaces are
    /// interchangeable.
    pub fn clear_interval(&self, id: TimerId) {
        self.registry.cancel(id);
    }

    /// Cancels an immediate task. Unknown ids are a silent no-op.
    pub fn clear_immediate(&self, id: TimerId) {
        self.registry.cancel(id);
    }

    /// Runs one loop invocation: flush the pending queue, drain, shut down.
    ///
    /// Resolves once every registered task has fired for the last time or
    /// been cancelled. Callbacks may keep the drain going by registering
    /// further tasks; with an uncleared repeating task this future never
    /// resolves, which is the contract rather than a defect.
    ///
    /// Anomalies never propagate: callback failures and shutdown stalls are
    /// published as severe events and the drain continues (or the loop
    /// returns). Calling `run()` while another invocation is draining
    /// returns immediately without touching its state.
    pub async fn run(&self) {
        let scheduler = Scheduler::start(Arc::clone(&self.registry), self.bus.clone());
        let flushed = match self.registry.activate(scheduler) {
            Ok(flushed) => flushed,
            Err(unused) => {
                // Another invocation is draining; discard the fresh machinery.
                let _ = unused.shutdown(self.cfg.shutdown_grace).await;
                return;
            }
        };

        self.bus.publish(Event::now(EventKind::LoopStarted).with_pending(flushed));

        let scheduler = loop {
            self.registry.drained().await;
            // A callback may have squeezed a registration in between the
            // emptiness signal and here; keep waiting if so.
            match self.registry.try_deactivate() {
                Some(scheduler) => break scheduler,
                None => continue,
            }
        };

        self.bus.publish(Event::now(EventKind::LoopDrained));

        if let Err(err) = scheduler.shutdown(self.cfg.shutdown_grace).await {
            self.bus.publish(Event::shutdown_stalled(err.to_string()));
        }
    }
}

/// Splits a registration argument slice into callback, delay, and captures.
fn parse_registration<V: HostValue>(
    args: &[V],
) -> Result<(CallbackRef<V>, i32, Vec<V>), RegisterError> {
    if args.len() < 2 {
        return Err(RegisterError::MissingArguments);
    }
    let callback = args[0].as_callback().ok_or(RegisterError::NotInvokable)?;
    let delay_ms = args[1]
        .as_integer()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(RegisterError::InvalidDelay)?;
    Ok((callback, delay_ms, args[2..].to_vec()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    use tokio::time::{Instant, timeout};

    use super::*;
    use crate::error::CallbackError;
    use crate::subscribers::Subscribe;
    use crate::tasks::CallbackFn;

    /// Minimal host value: integers, text, and invokable functions.
    #[derive(Clone)]
    enum TestValue {
        Int(i64),
        Text(&'static str),
        Func(CallbackRef<TestValue>),
    }

    impl HostValue for TestValue {
        fn as_callback(&self) -> Option<CallbackRef<TestValue>> {
            match self {
                TestValue::Func(f) => Some(Arc::clone(f)),
                _ => None,
            }
        }

        fn as_integer(&self) -> Option<i64> {
            match self {
                TestValue::Int(n) => Some(*n),
                _ => None,
            }
        }
    }

    fn func(
        name: &'static str,
        f: impl Fn(&[TestValue]) -> Result<(), CallbackError> + Send + Sync + 'static,
    ) -> TestValue {
        TestValue::Func(CallbackFn::arc(name, f))
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> TestValue {
        let log = Arc::clone(log);
        func(name, move |_args| {
            log.lock().unwrap().push(name);
            Ok(())
        })
    }

    fn fresh() -> Arc<TimerLoop<TestValue>> {
        TimerLoop::new(LoopConfig::default())
    }

    #[tokio::test]
    async fn test_shorter_delay_fires_first() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        lp.set_timeout(&[recorder("slow", &log), TestValue::Int(50)])
            .expect("registration should succeed");
        lp.set_timeout(&[recorder("fast", &log), TestValue::Int(10)])
            .expect("registration should succeed");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(*log.lock().unwrap(), vec!["fast", "slow"]);
    }

    #[tokio::test]
    async fn test_interval_repeats_until_cleared() {
        let lp = fresh();
        let fired = Arc::new(AtomicU32::new(0));
        let id_cell = Arc::new(OnceLock::new());

        let cb = {
            let lp = Arc::clone(&lp);
            let fired = Arc::clone(&fired);
            let id_cell = Arc::clone(&id_cell);
            func("ticker", move |_args| {
                let n = fired.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= 3 {
                    if let Some(id) = id_cell.get() {
                        lp.clear_interval(*id);
                    }
                }
                Ok(())
            })
        };

        let id = lp
            .set_interval(&[cb, TestValue::Int(10)])
            .expect("registration should succeed");
        id_cell.set(id).expect("id cell is set once");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain after the interval clears itself");
        assert_eq!(fired.load(Ordering::SeqCst), 3, "interval must fire exactly three times");
    }

    #[tokio::test]
    async fn test_interval_firings_are_spaced_by_the_period() {
        let lp = fresh();
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let id_cell = Arc::new(OnceLock::new());

        let cb = {
            let lp = Arc::clone(&lp);
            let stamps = Arc::clone(&stamps);
            let id_cell = Arc::clone(&id_cell);
            func("metronome", move |_args| {
                let mut at = stamps.lock().unwrap();
                at.push(Instant::now());
                if at.len() >= 3 {
                    if let Some(id) = id_cell.get() {
                        lp.clear_interval(*id);
                    }
                }
                Ok(())
            })
        };

        let registered = Instant::now();
        let id = lp
            .set_interval(&[cb, TestValue::Int(60)])
            .expect("registration should succeed");
        id_cell.set(id).expect("id cell is set once");

        timeout(Duration::from_secs(3), lp.run())
            .await
            .expect("loop should drain after the interval clears itself");

        let at = stamps.lock().unwrap().clone();
        assert_eq!(at.len(), 3);
        // The interval doubles as the initial delay.
        let first_wait = at[0] - registered;
        assert!(
            first_wait >= Duration::from_millis(45) && first_wait <= Duration::from_millis(250),
            "first firing came {first_wait:?} after registration, expected about one period",
        );
        for pair in at.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                gap >= Duration::from_millis(45) && gap <= Duration::from_millis(250),
                "successive firings {gap:?} apart, expected about one period",
            );
        }
    }

    #[tokio::test]
    async fn test_immediate_runs_before_delayed_tasks() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        lp.set_timeout(&[recorder("delayed", &log), TestValue::Int(30)])
            .expect("registration should succeed");
        let id = lp
            .set_immediate(&[recorder("immediate", &log)])
            .expect("registration should succeed")
            .expect("a callback argument yields an id");
        assert_eq!(id.as_u64(), 1, "immediates draw from the same id sequence");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(*log.lock().unwrap(), vec!["immediate", "delayed"]);
    }

    #[tokio::test]
    async fn test_set_immediate_without_arguments_is_undefined() {
        let lp = fresh();
        let out = lp.set_immediate(&[]).expect("no arguments is not an error");
        assert!(out.is_none(), "no callback means no id");
    }

    #[tokio::test]
    async fn test_registration_argument_validation() {
        let lp = fresh();

        assert_eq!(lp.set_timeout(&[]), Err(RegisterError::MissingArguments));
        assert_eq!(
            lp.set_timeout(&[func("lone", |_args| Ok(()))]),
            Err(RegisterError::MissingArguments),
            "a delay argument is required",
        );
        assert_eq!(
            lp.set_timeout(&[TestValue::Int(1), TestValue::Int(5)]),
            Err(RegisterError::NotInvokable),
        );
        assert_eq!(
            lp.set_interval(&[func("f", |_args| Ok(())), TestValue::Text("soon")]),
            Err(RegisterError::InvalidDelay),
        );
        assert_eq!(
            lp.set_timeout(&[func("f", |_args| Ok(())), TestValue::Int(i64::from(i32::MAX) + 1)]),
            Err(RegisterError::InvalidDelay),
            "delays beyond 32 bits are rejected",
        );
        assert_eq!(lp.set_immediate(&[TestValue::Int(9)]), Err(RegisterError::NotInvokable));
    }

    // Plain #[test]: before run() registration only queues, no runtime involved.
    #[test]
    fn test_registration_before_run_needs_no_runtime() {
        let lp = fresh();
        let id = lp
            .set_timeout(&[func("parked", |_args| Ok(())), TestValue::Int(10)])
            .expect("registration should succeed");
        lp.clear_timeout(id);
        lp.set_immediate(&[func("eager", |_args| Ok(()))])
            .expect("registration should succeed");
    }

    #[tokio::test]
    async fn test_negative_delay_fires_now() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        lp.set_timeout(&[recorder("later", &log), TestValue::Int(20)])
            .expect("registration should succeed");
        lp.set_timeout(&[recorder("past", &log), TestValue::Int(-1000)])
            .expect("negative delays are clamped, not rejected");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(*log.lock().unwrap(), vec!["past", "later"]);
    }

    #[tokio::test]
    async fn test_clear_before_run_prevents_firing() {
        let lp = fresh();
        let fired = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&fired);

        let id = lp
            .set_timeout(&[
                func("never", move |_args| {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
                TestValue::Int(10),
            ])
            .expect("registration should succeed");
        lp.clear_timeout(id);
        lp.clear_timeout(id); // repeated clears are no-ops

        let started = Instant::now();
        timeout(Duration::from_secs(1), lp.run())
            .await
            .expect("loop should drain");
        assert!(started.elapsed() < Duration::from_millis(500), "nothing was left to wait for");
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_unknown_id_is_silent() {
        let lp = fresh();
        lp.clear_timeout(TimerId::from_raw(404));
        lp.clear_interval(TimerId::from_raw(405));
        lp.clear_immediate(TimerId::from_raw(406));

        timeout(Duration::from_secs(1), lp.run())
            .await
            .expect("an empty loop should return at once");
    }

    #[tokio::test]
    async fn test_callback_cancels_another_task_mid_drain() {
        let lp = fresh();
        let fired = Arc::new(AtomicU32::new(0));
        let victim_cell = Arc::new(OnceLock::new());

        let killer = {
            let lp = Arc::clone(&lp);
            let victim_cell = Arc::clone(&victim_cell);
            func("killer", move |_args| {
                if let Some(id) = victim_cell.get() {
                    lp.clear_timeout(*id);
                }
                Ok(())
            })
        };
        let count = Arc::clone(&fired);
        let victim = func("victim", move |_args| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        lp.set_timeout(&[killer, TestValue::Int(10)])
            .expect("registration should succeed");
        let victim_id = lp
            .set_timeout(&[victim, TestValue::Int(60)])
            .expect("registration should succeed");
        victim_cell.set(victim_id).expect("id cell is set once");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain early");
        assert_eq!(fired.load(Ordering::SeqCst), 0, "cancelled task must not fire");
    }

    #[tokio::test]
    async fn test_callback_registration_extends_the_drain() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        let second = recorder("second", &log);
        let first = {
            let lp = Arc::clone(&lp);
            let log = Arc::clone(&log);
            func("first", move |_args| {
                log.lock().unwrap().push("first");
                lp.set_timeout(&[second.clone(), TestValue::Int(20)])
                    .expect("registration during the drain should succeed");
                Ok(())
            })
        };

        lp.set_timeout(&[first, TestValue::Int(20)])
            .expect("registration should succeed");

        let started = Instant::now();
        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert!(started.elapsed() >= Duration::from_millis(40), "both delays must elapse");
    }

    #[tokio::test]
    async fn test_uncleared_interval_keeps_the_loop_running() {
        let lp = fresh();
        let fired = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&fired);

        lp.set_interval(&[
            func("forever", move |_args| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            TestValue::Int(20),
        ])
        .expect("registration should succeed");

        let outcome = timeout(Duration::from_millis(300), lp.run()).await;
        assert!(outcome.is_err(), "run must still be draining with a live interval");
        assert!(fired.load(Ordering::SeqCst) >= 2, "the interval must keep firing meanwhile");
    }

    #[tokio::test]
    async fn test_failing_callback_does_not_stop_the_drain() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        lp.set_timeout(&[
            func("faulty", |_args| Err(CallbackError::raised("boom"))),
            TestValue::Int(10),
        ])
        .expect("registration should succeed");
        lp.set_timeout(&[recorder("survivor", &log), TestValue::Int(30)])
            .expect("registration should succeed");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(*log.lock().unwrap(), vec!["survivor"]);
    }

    #[tokio::test]
    async fn test_panicking_callback_is_contained() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        lp.set_timeout(&[func("wild", |_args| panic!("lost it")), TestValue::Int(10)])
            .expect("registration should succeed");
        lp.set_timeout(&[recorder("survivor", &log), TestValue::Int(30)])
            .expect("registration should succeed");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(*log.lock().unwrap(), vec!["survivor"]);
    }

    #[tokio::test]
    async fn test_failing_interval_keeps_its_schedule() {
        let lp = fresh();
        let fired = Arc::new(AtomicU32::new(0));
        let id_cell = Arc::new(OnceLock::new());

        let cb = {
            let lp = Arc::clone(&lp);
            let fired = Arc::clone(&fired);
            let id_cell = Arc::clone(&id_cell);
            func("flaky", move |_args| {
                let n = fired.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= 3 {
                    if let Some(id) = id_cell.get() {
                        lp.clear_interval(*id);
                    }
                }
                Err(CallbackError::raised("every time"))
            })
        };

        let id = lp
            .set_interval(&[cb, TestValue::Int(10)])
            .expect("registration should succeed");
        id_cell.set(id).expect("id cell is set once");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(
            fired.load(Ordering::SeqCst),
            3,
            "failures must not unschedule a repeating task",
        );
    }

    #[tokio::test]
    async fn test_loop_is_reusable_after_draining() {
        let lp = fresh();
        let log = Arc::new(Mutex::new(Vec::new()));

        lp.set_timeout(&[recorder("first-run", &log), TestValue::Int(10)])
            .expect("registration should succeed");
        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("first drain");

        let id = lp
            .set_timeout(&[recorder("second-run", &log), TestValue::Int(10)])
            .expect("registration between runs should queue");
        assert_eq!(id.as_u64(), 1, "ids continue across invocations");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("second drain");
        assert_eq!(*log.lock().unwrap(), vec!["first-run", "second-run"]);
    }

    #[tokio::test]
    async fn test_second_concurrent_run_returns_immediately() {
        let lp = fresh();
        lp.set_timeout(&[func("slow", |_args| Ok(())), TestValue::Int(150)])
            .expect("registration should succeed");

        let first = {
            let lp = Arc::clone(&lp);
            tokio::spawn(async move { lp.run().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;

        let started = Instant::now();
        lp.run().await;
        assert!(
            started.elapsed() < Duration::from_millis(100),
            "a second invocation must not join the drain",
        );

        timeout(Duration::from_secs(2), first)
            .await
            .expect("first invocation should drain")
            .expect("first invocation should not panic");
    }

    #[tokio::test]
    async fn test_extra_arguments_reach_the_callback() {
        let lp = fresh();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let cb = func("args", move |args| {
            let mut out = sink.lock().unwrap();
            for arg in args {
                match arg {
                    TestValue::Int(n) => out.push(format!("int:{n}")),
                    TestValue::Text(s) => out.push(format!("text:{s}")),
                    TestValue::Func(_) => out.push("func".to_string()),
                }
            }
            Ok(())
        });

        lp.set_timeout(&[cb, TestValue::Int(0), TestValue::Int(7), TestValue::Text("x")])
            .expect("registration should succeed");

        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");
        assert_eq!(*seen.lock().unwrap(), vec!["int:7".to_string(), "text:x".to_string()]);
    }

    struct KindRecorder {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait::async_trait]
    impl Subscribe for KindRecorder {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }
    }

    #[tokio::test]
    async fn test_lifecycle_events_reach_subscribers() {
        let seen = Arc::new(KindRecorder { kinds: Mutex::new(Vec::new()) });
        let lp: Arc<TimerLoop<TestValue>> = TimerLoop::builder(LoopConfig::default())
            .with_subscribers(vec![Arc::clone(&seen) as Arc<dyn Subscribe>])
            .build();

        lp.set_timeout(&[func("observed", |_args| Ok(())), TestValue::Int(10)])
            .expect("registration should succeed");
        timeout(Duration::from_secs(2), lp.run())
            .await
            .expect("loop should drain");

        // Fan-out is asynchronous; give the subscriber worker a moment.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let kinds = seen.kinds.lock().unwrap().clone();
        for expected in [
            EventKind::TimerQueued,
            EventKind::LoopStarted,
            EventKind::TimerScheduled,
            EventKind::TimerFired,
            EventKind::TimerRetired,
            EventKind::LoopDrained,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?} in {kinds:?}");
        }
    }
}
