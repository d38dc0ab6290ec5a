//! # Host value interpretation.
//!
//! Registration entry points receive raw argument slices from the host
//! binding: a script engine hands over whatever the script passed, in
//! order. [`HostValue`] is the minimal interpretation surface the loop needs
//! to validate those slices: is a value invokable, and is it an integer?

use crate::tasks::callback::CallbackRef;

/// Opaque host (script-engine) value.
///
/// The loop never inspects host values beyond two questions asked during
/// argument validation:
/// - [`as_callback`](HostValue::as_callback): is this an invokable
///   capability? (first argument of `set_timeout` / `set_interval` /
///   `set_immediate`)
/// - [`as_integer`](HostValue::as_integer): is this an integer? (delay
///   argument)
///
/// Extra arguments past the delay are captured as-is and passed unchanged to
/// every invocation, which is why `Clone` is required; host values are
/// expected to be cheap handles into the engine's heap.
pub trait HostValue: Clone + Send + Sync + 'static {
    /// Returns the invokable capability behind this value, if it is one.
    fn as_callback(&self) -> Option<CallbackRef<Self>>;

    /// Returns this value as an integer, if it is integral.
    ///
    /// Delay validation additionally requires the result to fit in 32 bits,
    /// mirroring host integer boxing; out-of-range values fail registration
    /// with [`RegisterError::InvalidDelay`](crate::RegisterError::InvalidDelay).
    fn as_integer(&self) -> Option<i64>;
}
