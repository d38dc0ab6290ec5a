//! # Loop configuration.
//!
//! Provides [`LoopConfig`], centralized settings for a [`TimerLoop`](crate::TimerLoop).
//!
//! Two knobs only: this loop has no restart policies, no concurrency limits
//! (callback execution is always serialized) and no per-task timeouts, so
//! configuration stays small.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use timerloop::LoopConfig;
//!
//! let mut cfg = LoopConfig::default();
//! cfg.shutdown_grace = Duration::from_secs(2);
//!
//! assert_eq!(cfg.bus_capacity, 1024);
//! ```

use std::time::Duration;

/// Configuration for a timer loop instance.
///
/// ## Field semantics
/// - `shutdown_grace`: maximum wait for the dispatch worker to finish after
///   the registry drains (`0s` = do not wait, report immediately if the
///   worker is still running)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// Maximum time to wait for the scheduler to shut down once the registry
    /// is empty.
    ///
    /// When a loop invocation finishes draining:
    /// - Remaining timer futures are cancelled via their tokens
    /// - The dispatch lane is closed and the worker drains residual firings
    /// - If the worker has not stopped within `shutdown_grace`, a severe
    ///   `ShutdownStalled` event is published and `run()` returns anyway
    pub shutdown_grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// observe `Lagged` and skip the oldest items. Minimum value is 1.
    pub bus_capacity: usize,
}

impl LoopConfig {
    /// Returns the bus capacity clamped to a minimum of 1.
    ///
    /// The bus uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for LoopConfig {
    /// Default configuration:
    ///
    /// - `shutdown_grace = 5s` (the worker only lags when a callback is
    ///   mid-invocation at drain time)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            shutdown_grace: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}
