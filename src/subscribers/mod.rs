//! # Event subscribers for the timer loop.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`]
//! fan-out, and the built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Registry / dispatch worker ── publish(Event) ──► Bus
//!                                                     │
//!                 listener pump (spawned at build) ◄──┘
//!                                  │
//!                          SubscriberSet::emit
//!                          ┌───────┼────────┐
//!                          ▼       ▼        ▼
//!                      LogWriter  Metrics  Custom ...
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react (logging, metrics, alerts)
//! - **Test recorders** - capture events to assert on loop behavior

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
