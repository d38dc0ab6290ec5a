//! # timerloop
//!
//! **Timerloop** is a blocking timer event loop for embedded script hosts.
//!
//! It provides the classic script timer namespace (`set_timeout`,
//! `set_interval`, `set_immediate` and the matching `clear_*` calls) on top
//! of Tokio, plus a `run()` future that resolves only when every registered
//! task has fired for the last time or been cancelled. The crate is designed
//! as a building block for language bindings that need browser-style timer
//! semantics inside a Rust process.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!    ┌─────────────────────┐  set_timeout / set_interval / set_immediate
//!    │     host script     │ ─────────────────────────────────┐
//!    └─────────────────────┘                                  ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  TimerLoop (host-facing surface)                                     │
//! │  - Registry (single lock: ids, entries, pending queue, scheduler)    │
//! │  - Bus (broadcast events)                                            │
//! │  - SubscriberSet (fans out to user subscribers)                      │
//! └──────┬───────────────────────────────────────────────────────┬───────┘
//!        ▼ run(): Scheduler::start + flush queue                 │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐     │
//!     │ timer future │   │ timer future │   │ timer future │     │
//!     │  (one-shot)  │   │ (repeating)  │   │  (one-shot)  │     │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘     │
//!      │ firing           │ firing per tick  │ firing            │
//!      ▼                  ▼                  ▼                    │
//! ┌──────────────────────────────────────────────────────────────┴───────┐
//! │            dispatch lane (unbounded mpsc, arrival order)             │
//! └─────────────────────────────────┬────────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │    dispatch worker     │  one callback at a time;
//!                       │ (serial invocations)   │  errors/panics contained
//!                       └───┬────────────────┬───┘
//!                           ▼                ▼
//!                     Registry::retire   Bus ──► listener ──► SubscriberSet
//!                     (one-shots only)             (per-sub queues + workers)
//! ```
//!
//! ### Lifecycle
//! ```text
//! set_timeout(args) ──► parse ──► Registry::register
//!                                   ├─ loop inactive ─► pending queue
//!                                   └─ loop active   ─► Scheduler::submit
//!
//! run() {
//!   ├─► Scheduler::start (spawns the dispatch worker)
//!   ├─► Registry::activate: flush pending queue in order, skip dead ids
//!   ├─► publish LoopStarted{ pending }
//!   ├─► await Registry::drained  (Notify on empty; no polling)
//!   │       timer elapses ─► firing ─► dispatch worker:
//!   │         ├─ skip when cancelled after firing
//!   │         ├─ invoke callback with captured args (serial)
//!   │         ├─ publish TimerFired / CallbackFailed
//!   │         └─ one-shot ─► retire ─► maybe signal empty
//!   ├─► publish LoopDrained
//!   └─► Scheduler::shutdown(grace) ─► maybe publish ShutdownStalled
//! }
//!
//! Uncancelled repeating tasks never retire, so run() never resolves: that
//! is the contract. Callbacks may register and cancel tasks freely; the
//! drain extends until the registry empties.
//! ```
//!
//! ## Features
//! | Area                 | Description                                                             | Key types / traits                        |
//! |----------------------|-------------------------------------------------------------------------|-------------------------------------------|
//! | **Registration API** | The script timer namespace: one-shots, intervals, immediates, clears.   | [`TimerLoop`], [`TimerId`]                |
//! | **Run loop**         | Blocking drain that resolves once the registry empties.                 | [`TimerLoop::run`]                        |
//! | **Callbacks**        | Host-side invokable capabilities with captured arguments.               | [`Callback`], [`CallbackFn`], [`HostValue`] |
//! | **Subscriber API**   | Hook into timer lifecycle events (logging, metrics, custom sinks).      | [`Subscribe`], [`Event`]                  |
//! | **Errors**           | Typed errors for registration and callback failures.                    | [`RegisterError`], [`CallbackError`]      |
//! | **Configuration**    | Centralize runtime settings.                                            | [`LoopConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use timerloop::{CallbackFn, CallbackRef, HostValue, LoopConfig, TimerLoop};
//!
//! /// Host values are whatever the embedded engine passes around.
//! #[derive(Clone)]
//! enum Value {
//!     Int(i64),
//!     Func(CallbackRef<Value>),
//! }
//!
//! impl HostValue for Value {
//!     fn as_callback(&self) -> Option<CallbackRef<Value>> {
//!         match self {
//!             Value::Func(f) => Some(Arc::clone(f)),
//!             _ => None,
//!         }
//!     }
//!     fn as_integer(&self) -> Option<i64> {
//!         match self {
//!             Value::Int(n) => Some(*n),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn timerloop::Subscribe>> = {
//!         use timerloop::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn timerloop::Subscribe>> = Vec::new();
//!
//!     let lp: Arc<TimerLoop<Value>> = TimerLoop::builder(LoopConfig::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let hello = Value::Func(CallbackFn::arc("hello", |args: &[Value]| {
//!         if let Some(Value::Int(n)) = args.first() {
//!             println!("hello #{n} from a timer");
//!         }
//!         Ok(())
//!     }));
//!
//!     // Callback, delay in milliseconds, then captured arguments.
//!     lp.set_timeout(&[hello, Value::Int(25), Value::Int(1)])
//!         .expect("valid registration");
//!
//!     // Resolves once every task, including any registered by callbacks
//!     // along the way, has fired for the last time or been cancelled.
//!     lp.run().await;
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::LoopConfig;
pub use core::{TimerLoop, TimerLoopBuilder};
pub use error::{CallbackError, RegisterError};
pub use events::{Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{Callback, CallbackFn, CallbackRef, HostValue, TimerId};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
