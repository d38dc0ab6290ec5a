//! # Example: interval_countdown
//!
//! A repeating task that cancels itself after a fixed number of ticks.
//!
//! Demonstrates how to:
//! - Register an interval (the interval doubles as the initial delay).
//! - Cancel a task from inside its own callback via [`TimerLoop::clear_interval`].
//! - Rely on [`TimerLoop::run`] resolving exactly when the last task retires.
//!
//! An interval that is never cleared keeps `run()` pending forever, so the
//! self-clear here is what lets the program exit.
//!
//! ## Run
//! ```bash
//! cargo run --example interval_countdown
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

use timerloop::{CallbackFn, CallbackRef, HostValue, LoopConfig, TimerLoop};

#[derive(Clone)]
enum Value {
    Int(i64),
    Func(CallbackRef<Value>),
}

impl HostValue for Value {
    fn as_callback(&self) -> Option<CallbackRef<Value>> {
        match self {
            Value::Func(f) => Some(Arc::clone(f)),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lp: Arc<TimerLoop<Value>> = TimerLoop::new(LoopConfig::default());

    // The callback needs its own id to clear itself; the id only exists
    // after registration, hence the cell.
    let remaining = Arc::new(AtomicU32::new(5));
    let id_cell = Arc::new(OnceLock::new());

    let tick = {
        let lp = Arc::clone(&lp);
        let remaining = Arc::clone(&remaining);
        let id_cell = Arc::clone(&id_cell);
        Value::Func(CallbackFn::arc("countdown", move |_args: &[Value]| {
            let left = remaining.fetch_sub(1, Ordering::SeqCst) - 1;
            println!("[countdown] {left}");
            if left == 0 {
                if let Some(id) = id_cell.get() {
                    lp.clear_interval(*id);
                }
            }
            Ok(())
        }))
    };

    let id = lp.set_interval(&[tick, Value::Int(200)])?;
    id_cell.set(id).expect("id cell is set once");

    lp.run().await; // resolves after the fifth tick clears the interval
    println!("[main] lift-off");
    Ok(())
}
