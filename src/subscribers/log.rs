//! # Built-in stdout logger.
//!
//! [`LogWriter`] renders each event as one readable line. Severe diagnostics
//! (callback failures, shutdown stalls) are printed even when nothing else
//! is configured, which is why the `logging` feature is on by default.
//!
//! ## Output format
//! ```text
//! [queued] timer=0 delay=50ms
//! [scheduled] timer=0 delay=50ms
//! [loop-started] pending=2
//! [fired] timer=0 callback=tick
//! [callback-failed] timer=1 callback=tick err="ReferenceError: x is not defined"
//! [retired] timer=0
//! [cancelled] timer=2
//! [loop-drained]
//! [shutdown-stalled] reason="dispatch worker still running after 5s"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Prints every loop event to stdout, one line each.
///
/// Exported via the `logging` feature (enabled by default) and meant for
/// development and demos. For production observability implement a custom
/// [`Subscribe`] with structured logging or metrics instead.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TimerQueued => {
                if let (Some(timer), Some(delay)) = (e.timer, e.delay_ms) {
                    match e.period_ms {
                        Some(p) => println!("[queued] timer={timer} delay={delay}ms period={p}ms"),
                        None => println!("[queued] timer={timer} delay={delay}ms"),
                    }
                }
            }
            EventKind::TimerScheduled => {
                if let (Some(timer), Some(delay)) = (e.timer, e.delay_ms) {
                    match e.period_ms {
                        Some(p) => {
                            println!("[scheduled] timer={timer} delay={delay}ms period={p}ms")
                        }
                        None => println!("[scheduled] timer={timer} delay={delay}ms"),
                    }
                }
            }
            EventKind::TimerFired => {
                if let Some(timer) = e.timer {
                    let callback = e.callback.as_deref().unwrap_or("?");
                    println!("[fired] timer={timer} callback={callback}");
                }
            }
            EventKind::TimerRetired => {
                if let Some(timer) = e.timer {
                    println!("[retired] timer={timer}");
                }
            }
            EventKind::TimerCancelled => {
                if let Some(timer) = e.timer {
                    println!("[cancelled] timer={timer}");
                }
            }
            EventKind::CallbackFailed => {
                if let Some(timer) = e.timer {
                    let callback = e.callback.as_deref().unwrap_or("?");
                    let reason = e.reason.as_deref().unwrap_or("");
                    println!("[callback-failed] timer={timer} callback={callback} err={reason:?}");
                }
            }
            EventKind::LoopStarted => {
                println!("[loop-started] pending={}", e.pending.unwrap_or(0));
            }
            EventKind::LoopDrained => {
                println!("[loop-drained]");
            }
            EventKind::ShutdownStalled => {
                let reason = e.reason.as_deref().unwrap_or("");
                println!("[shutdown-stalled] reason={reason:?}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
