//! Cooperative cancellation
//!
//! A single flag observed by every task at its suspension points. Requesting
//! shutdown only stores to an atomic, so it is safe from a signal handler.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_time::{Duration, Timer};

/// How often [`ShutdownToken::wait`] re-checks the flag
const WAIT_POLL_PERIOD: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct ShutdownToken {
    requested: AtomicBool,
}

impl ShutdownToken {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Request shutdown.
    ///
    /// Idempotent. Returns `true` only for the call that set the flag.
    pub fn request(&self) -> bool {
        !self.requested.swap(true, Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        while !self.is_requested() {
            Timer::after(WAIT_POLL_PERIOD).await;
        }
    }
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}
