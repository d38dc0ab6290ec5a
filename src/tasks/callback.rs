//! # Callback capability.
//!
//! Defines [`Callback`], the invokable seam between the loop and the host,
//! and [`CallbackRef`], the shared handle form used everywhere.
//!
//! Firing a task means invoking its capability with the captured argument
//! list. The capability receives itself as the receiver (`&self`), mirroring
//! the host convention where a function invoked by a timer is its own `this`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CallbackError;

/// # Invokable capability supplied by the host.
///
/// The loop treats callbacks as opaque: the only contract is "invokable with
/// the captured arguments, may fail". All invocations happen on the loop's
/// dispatch worker, one at a time, so implementations never observe
/// concurrent calls to themselves or to any other callback of the same loop.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use timerloop::{Callback, CallbackError};
///
/// struct Print;
///
/// #[async_trait]
/// impl Callback<String> for Print {
///     async fn invoke(&self, args: &[String]) -> Result<(), CallbackError> {
///         println!("{}", args.join(" "));
///         Ok(())
///     }
///
///     fn name(&self) -> &str { "print" }
/// }
/// ```
#[async_trait]
pub trait Callback<V: Send + Sync + 'static>: Send + Sync + 'static {
    /// Invokes the capability with the captured arguments.
    ///
    /// A returned error is published as a severe `CallbackFailed` event; it
    /// never aborts the drain and is never retried. A one-shot task whose
    /// invocation failed still counts as done.
    async fn invoke(&self, args: &[V]) -> Result<(), CallbackError>;

    /// Returns a human-readable callback name for logs and events.
    ///
    /// Prefer short names ("tick", "flush"). The default is deliberately
    /// generic; override it when the host knows better.
    fn name(&self) -> &str {
        "callback"
    }
}

/// Shared handle to a callback capability (`Arc<dyn Callback<V>>`).
pub type CallbackRef<V> = Arc<dyn Callback<V>>;
