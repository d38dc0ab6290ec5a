//! Loop events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the registry, the dispatch worker,
//! and the run-loop controller.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] - event classification and payload metadata
//! - [`Bus`] - thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Registry` (queued/scheduled/cancelled), the dispatch
//!   worker (fired/retired/failed), `TimerLoop::run` (loop lifecycle).
//! - **Consumer**: the listener pump spawned at build time, which fans out
//!   to the [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use event::{Event, EventKind};
