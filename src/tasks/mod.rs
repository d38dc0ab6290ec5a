//! # Task model: identities, callback capabilities, host values.
//!
//! This module provides the types registration builds on:
//! - [`TimerId`]: task identity (monotonic, never reused)
//! - [`Callback`]: trait for the opaque invokable capability a host supplies
//! - [`CallbackFn`]: function-backed callback implementation
//! - [`CallbackRef`]: shared reference to a callback (`Arc<dyn Callback<V>>`)
//! - [`HostValue`]: interpretation surface for raw host argument values
//! - `Task`: the registered unit itself (crate-internal; hosts only ever
//!   hold a [`TimerId`])

mod callback;
mod callback_fn;
mod id;
mod task;
mod value;

pub use callback::{Callback, CallbackRef};
pub use callback_fn::CallbackFn;
pub use id::TimerId;
pub use value::HostValue;

pub(crate) use task::{Task, TaskRef};
