//! Error types used by the timer loop and by callback capabilities.
//!
//! This module defines the error types:
//!
//! - [`RegisterError`] - argument-validation failures raised synchronously by
//!   the registration entry points, before any task is created.
//! - [`CallbackError`] - a failure raised by an invoked callback capability
//!   (the host-side analogue of a thrown exception).
//! - [`ShutdownError`] - scheduler teardown anomalies, reported through the
//!   event stream rather than returned to the host.
//!
//! The host-facing types provide helper methods (`as_label`, `as_message`)
//! for logging/metrics.

use std::time::Duration;

use thiserror::Error;

/// # Errors produced by argument validation at registration time.
///
/// Registration fails before any side effect: no id is allocated and nothing
/// is inserted into the registry. These are programmer errors in the calling
/// script, which is why they propagate immediately instead of being deferred
/// to the drain phase.
///
/// Unknown ids passed to `clear_*` are deliberately **not** errors (silent
/// no-op), and `set_immediate` with no arguments returns an undefined
/// sentinel instead of `MissingArguments`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// Fewer than two arguments were supplied (callback and delay required).
    #[error("expected at least a callback and a delay")]
    MissingArguments,

    /// The first argument is not an invokable capability.
    #[error("callback argument is not invokable")]
    NotInvokable,

    /// The second argument is not an integer representable in 32 bits.
    #[error("delay argument is not an integer")]
    InvalidDelay,
}

impl RegisterError {
    /// Stable snake_case label for logs and metrics.
    ///
    /// # Example
    /// ```
    /// use timerloop::RegisterError;
    ///
    /// assert_eq!(RegisterError::NotInvokable.as_label(), "register_not_invokable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::MissingArguments => "register_missing_arguments",
            RegisterError::NotInvokable => "register_not_invokable",
            RegisterError::InvalidDelay => "register_invalid_delay",
        }
    }

    /// Human-readable description of what went wrong.
    pub fn as_message(&self) -> String {
        match self {
            RegisterError::MissingArguments => "missing arguments: need callback and delay".to_string(),
            RegisterError::NotInvokable => "first argument is not invokable".to_string(),
            RegisterError::InvalidDelay => "second argument is not a 32-bit integer".to_string(),
        }
    }
}

/// # Failure raised by an invoked callback capability.
///
/// The loop catches these at the dispatch worker: the failure is published as
/// a severe `CallbackFailed` event and the drain continues. A one-shot task
/// that failed is still considered done; a repeating task keeps its schedule
/// until explicitly cancelled. Nothing is ever retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The callback raised an error (host exception, rejected promise, etc.).
    #[error("callback raised: {error}")]
    Raised {
        /// The underlying error message, as reported by the host.
        error: String,
    },
}

impl CallbackError {
    /// Wraps a host-side failure message.
    ///
    /// # Example
    /// ```
    /// use timerloop::CallbackError;
    ///
    /// let err = CallbackError::raised("ReferenceError: x is not defined");
    /// assert!(err.as_message().contains("ReferenceError"));
    /// ```
    pub fn raised(error: impl Into<String>) -> Self {
        CallbackError::Raised { error: error.into() }
    }

    /// Stable snake_case label for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Raised { .. } => "callback_raised",
        }
    }

    /// Human-readable description of what went wrong.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Raised { error } => error.clone(),
        }
    }
}

/// # Scheduler teardown anomalies.
///
/// `run()` never propagates these to the host: a stalled shutdown is
/// published as a severe `ShutdownStalled` event and the loop returns
/// anyway. The variants exist so the event reason carries a precise
/// diagnosis.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShutdownError {
    /// The dispatch worker did not finish within the grace window.
    #[error("dispatch worker still running after {grace:?}")]
    GraceExceeded {
        /// The grace window that elapsed.
        grace: Duration,
    },

    /// The dispatch worker task did not join cleanly (cancelled or panicked).
    #[error("dispatch worker did not join cleanly: {detail}")]
    JoinFailed {
        /// Join error description.
        detail: String,
    },
}
