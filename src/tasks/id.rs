//! # Task identity.

use std::fmt;

/// Identity of one registered task.
///
/// Assigned at registration time from a per-loop counter that starts at 0 and
/// increases monotonically. An id identifies at most one logical task for its
/// entire lifetime and is never reused; cancellation or completion
/// permanently retires it.
///
/// Hosts echo ids back into `clear_*`. [`TimerId::from_raw`] rebuilds an id
/// from the plain integer a script held onto; an id that was never allocated
/// simply never resolves to a task, so clearing it is a no-op.
///
/// # Example
/// ```
/// use timerloop::TimerId;
///
/// let id = TimerId::from_raw(42);
/// assert_eq!(id.as_u64(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Rebuilds an id from its raw integer form (what scripts see).
    pub const fn from_raw(raw: u64) -> Self {
        TimerId(raw)
    }

    /// Returns the raw integer form.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
