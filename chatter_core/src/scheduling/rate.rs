use super::shutdown::Shutdown;
use crate::error::{ChatterError, ChatterResult};
use std::time::{Duration, Instant};

/// Fixed-frequency loop pacing
///
/// `sleep()` waits for the next period boundary measured from the previous
/// one, so time spent working inside the loop is absorbed. A loop that falls
/// more than one period behind restarts its schedule from now rather than
/// firing a burst of catch-up ticks.
pub struct Rate {
    period: Duration,
    last: Instant,
    shutdown: Shutdown,
}

impl Rate {
    pub fn new(rate_hz: f64, shutdown: Shutdown) -> ChatterResult<Self> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(ChatterError::config(format!(
                "Rate must be a positive frequency, got {}",
                rate_hz
            )));
        }
        Ok(Self {
            period: Duration::from_secs_f64(1.0 / rate_hz),
            last: Instant::now(),
            shutdown,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep until the next tick boundary
    ///
    /// Returns `false` if shutdown fired before or during the sleep.
    pub fn sleep(&mut self) -> bool {
        let now = Instant::now();
        let deadline = self.last + self.period;

        if deadline > now {
            if self.shutdown.wait_timeout(deadline - now) {
                return false;
            }
            self.last = deadline;
        } else {
            if self.shutdown.is_triggered() {
                return false;
            }
            self.last = if now - deadline > self.period { now } else { deadline };
        }
        true
    }
}
