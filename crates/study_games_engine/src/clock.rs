//! Cancellable elapsed-seconds counter.
//!
//! The clock holds no timer of its own. Whoever drives it (a tokio task in
//! the host, a loop in tests) calls [`Clock::tick`] once per period with the
//! token [`Clock::start`] handed out. Stopping or restarting the clock bumps
//! its epoch, so a tick queued before cancellation carries a stale token and
//! is discarded.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Proof that a tick belongs to one particular run of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockToken(u64);

/// Elapsed-time counter, one tick per second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Clock {
    elapsed: u64,
    running: bool,
    epoch: u64,
}

impl Clock {
    /// Creates a stopped clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets elapsed time to zero and starts counting.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> ClockToken {
        self.epoch += 1;
        self.elapsed = 0;
        self.running = true;
        debug!(epoch = self.epoch, "Clock started");
        ClockToken(self.epoch)
    }

    /// Stops counting. Stopping a stopped clock is a no-op.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.epoch += 1;
        debug!(elapsed = self.elapsed, "Clock stopped");
    }

    /// Stops the clock and zeroes elapsed time.
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed = 0;
    }

    /// Advances by one second if `token` belongs to the current run.
    ///
    /// Returns the new elapsed time, or `None` for a stale or stopped tick.
    pub fn tick(&mut self, token: ClockToken) -> Option<u64> {
        if !self.running || token.0 != self.epoch {
            debug!(?token, epoch = self.epoch, "Discarding stale tick");
            return None;
        }
        self.elapsed += 1;
        Some(self.elapsed)
    }

    /// Seconds counted so far.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Whether ticks are currently accepted.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Token of the current run, if the clock is running.
    pub fn token(&self) -> Option<ClockToken> {
        self.running.then_some(ClockToken(self.epoch))
    }
}
