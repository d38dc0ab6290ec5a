//! # Example: basic_timers
//!
//! Minimal example of one-shot and immediate timers with the built-in
//! logging subscriber.
//!
//! Demonstrates how to:
//! - Define a host value type implementing [`HostValue`].
//! - Register a one-shot with a delay and captured arguments.
//! - Register an immediate (zero-delay) task.
//! - Block on [`TimerLoop::run`] until everything has fired.
//!
//! ## Flow
//! ```text
//! set_timeout(greet, 300, "world") ──► pending queue
//! set_immediate(ready)             ──► pending queue
//! run()
//!     ├─► flush queue ─► timer futures
//!     ├─► [fired] ready            (immediate, ~0 ms)
//!     ├─► [fired] greet            (~300 ms)
//!     └─► registry empty ─► resolve
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_timers
//! ```

use std::sync::Arc;

use timerloop::{CallbackFn, CallbackRef, HostValue, LoopConfig, LogWriter, Subscribe, TimerLoop};

/// Host values as a scripting engine would hand them over.
#[derive(Clone)]
enum Value {
    Int(i64),
    Text(&'static str),
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
    // 1. Default configuration plus the stdout subscriber
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::default())];
    let lp: Arc<TimerLoop<Value>> = TimerLoop::builder(LoopConfig::default())
        .with_subscribers(subs)
        .build();

    // 2. A one-shot that receives its captured argument back
    let greet = Value::Func(CallbackFn::arc("greet", |args: &[Value]| {
        if let Some(Value::Text(who)) = args.first() {
            println!("[greet] hello, {who}!");
        }
        Ok(())
    }));
    lp.set_timeout(&[greet, Value::Int(300), Value::Text("world")])?;

    // 3. An immediate that fires before any delayed task
    let ready = Value::Func(CallbackFn::arc("ready", |_args: &[Value]| {
        println!("[ready] loop is live");
        Ok(())
    }));
    lp.set_immediate(&[ready])?;

    // 4. Drain: resolves once both tasks have fired
    lp.run().await;
    println!("[main] all timers done");
    Ok(())
}
