//! # Function-backed callback (`CallbackFn`)
//!
//! [`CallbackFn`] wraps a plain closure `F: Fn(&[V]) -> Result<(), CallbackError>`
//! as a [`Callback`]. The closure is synchronous, the common case for script
//! hosts, where invoking a function runs to completion on the calling thread.
//! Implement [`Callback`] directly when the host bridge needs to await.
//!
//! ## Example
//! ```rust
//! use timerloop::{CallbackError, CallbackFn, CallbackRef};
//!
//! let cb: CallbackRef<i64> = CallbackFn::arc("sum", |args: &[i64]| {
//!     let total: i64 = args.iter().sum();
//!     if total < 0 {
//!         return Err(CallbackError::raised("negative total"));
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(cb.name(), "sum");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CallbackError;
use crate::tasks::callback::{Callback, CallbackRef};

/// Function-backed callback implementation.
///
/// Wraps a closure invoked once per firing with the captured argument slice.
/// The closure must be `Fn` (not `FnMut`): firings share the same instance,
/// so any state it needs goes behind explicit `Arc`/`Mutex` inside the
/// closure.
pub struct CallbackFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> CallbackFn<F> {
    /// Creates a new function-backed callback.
    ///
    /// Prefer [`CallbackFn::arc`] when you immediately need a [`CallbackRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the callback and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use timerloop::{CallbackError, CallbackFn, CallbackRef};
    ///
    /// let cb: CallbackRef<String> = CallbackFn::arc("noop", |_args: &[String]| Ok(()));
    /// assert_eq!(cb.name(), "noop");
    /// ```
    pub fn arc<V>(name: impl Into<Cow<'static, str>>, f: F) -> CallbackRef<V>
    where
        V: Send + Sync + 'static,
        F: Fn(&[V]) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<V, F> Callback<V> for CallbackFn<F>
where
    V: Send + Sync + 'static,
    F: Fn(&[V]) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    async fn invoke(&self, args: &[V]) -> Result<(), CallbackError> {
        (self.f)(args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
