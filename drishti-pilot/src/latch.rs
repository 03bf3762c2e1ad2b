//! One-shot run latch shared by every pipeline task

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Process-wide running flag with single-trip semantics.
///
/// Starts running; `trip` moves it to stopped and nothing ever moves it
/// back. It is the sole cancellation signal: any task may trip it (user
/// quit, unrecoverable provider error), every loop reads it each
/// iteration.
pub struct RunLatch {
    running: AtomicBool,
}

impl RunLatch {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Trip the latch. Returns true for the call that actually tripped it.
    pub fn trip(&self) -> bool {
        let was_running = self.running.swap(false, Ordering::SeqCst);
        if was_running {
            info!("run latch tripped");
        }
        was_running
    }
}

impl Default for RunLatch {
    fn default() -> Self {
        Self::new()
    }
}
