//! # Builder: assembles a [`TimerLoop`] and its wiring.
//!
//! Construction wires three pieces together: the event bus, the subscriber
//! fan-out with its bus listener, and the registry. With subscribers
//! attached, `build()` spawns their workers and the listener, so it must run
//! within a Tokio runtime; without subscribers it spawns nothing.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::LoopConfig;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::HostValue;

use super::event_loop::TimerLoop;
use super::registry::Registry;

/// Builder for [`TimerLoop`].
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use timerloop::{CallbackRef, HostValue, LoopConfig, Subscribe, TimerLoop};
/// #[cfg(feature = "logging")]
/// use timerloop::LogWriter;
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
///     let mut subs: Vec<Arc<dyn Subscribe>> = Vec::new();
///     #[cfg(feature = "logging")]
///     subs.push(Arc::new(LogWriter::default()));
///
///     let lp: Arc<TimerLoop<Value>> = TimerLoop::builder(LoopConfig::default())
///         .with_subscribers(subs)
///         .build();
///
///     lp.run().await; // nothing registered: returns at once
/// }
/// ```
pub struct TimerLoopBuilder<V: HostValue> {
    cfg: LoopConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _host: PhantomData<fn() -> V>,
}

impl<V: HostValue> TimerLoopBuilder<V> {
    /// Creates a builder with the given configuration and no subscribers.
    pub fn new(cfg: LoopConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            _host: PhantomData,
        }
    }

    /// Attaches event subscribers.
    ///
    /// Subscribers observe every event from build time on, including
    /// registrations made before the first `run()`.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Assembles the loop.
    pub fn build(self) -> Arc<TimerLoop<V>> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let registry = Arc::new(Registry::new(bus.clone()));

        if !self.subscribers.is_empty() {
            spawn_listener(&bus, Arc::new(SubscriberSet::new(self.subscribers)));
        }
        Arc::new(TimerLoop::assemble(self.cfg, bus, registry))
    }
}

/// Forwards bus events to the subscriber set for the life of the bus.
///
/// The listener holds the set alive; when the last bus sender drops, the
/// listener exits and the subscriber workers drain their queues and stop.
fn spawn_listener(bus: &Bus, subs: Arc<SubscriberSet>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subs.emit(ev),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
