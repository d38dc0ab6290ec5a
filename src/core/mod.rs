//! Runtime core: registry, scheduling, dispatch, and the loop controller.
//!
//! - `registry`: all mutable loop state behind one lock, plus the emptiness
//!   signal the controller waits on;
//! - `scheduler`: per-task timer futures and the dispatch lane lifecycle;
//! - `executor`: the single worker invoking callbacks serially;
//! - `event_loop`: the host-facing surface (registration and `run()`);
//! - `builder`: wiring of bus, subscribers, and registry.

mod builder;
mod event_loop;
mod executor;
mod registry;
mod scheduler;

pub use builder::TimerLoopBuilder;
pub use event_loop::TimerLoop;
