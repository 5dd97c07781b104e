use parking_lot::Mutex;

/// Wall-clock time in seconds, never going backwards
///
/// Stamps taken from one `Clock` are non-decreasing even if the system clock
/// is stepped back (NTP correction, manual change) while the node runs.
pub struct Clock {
    source: Box<dyn Fn() -> f64 + Send + Sync>,
    last: Mutex<f64>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Clock reading the system wall time
    pub fn new() -> Self {
        Self::with_source(wall_secs)
    }

    /// Clock reading an arbitrary time source, in seconds
    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
            last: Mutex::new(0.0),
        }
    }

    /// Current time in seconds since the Unix epoch
    pub fn now_secs(&self) -> f64 {
        let reading = (self.source)().max(0.0);
        let mut last = self.last.lock();
        if reading > *last {
            *last = reading;
        }
        *last
    }
}

fn wall_secs() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_wall_clock_is_recent() {
        let clock = Clock::new();
        // 2020-01-01T00:00:00Z
        assert!(clock.now_secs() > 1_577_836_800.0);
    }

    #[test]
    fn test_clamps_backwards_steps() {
        let readings = [10.0, 12.5, 11.0, 13.0];
        let index = Arc::new(AtomicUsize::new(0));
        let i = index.clone();
        let clock = Clock::with_source(move || readings[i.fetch_add(1, Ordering::SeqCst)]);

        let stamps: Vec<f64> = (0..4).map(|_| clock.now_secs()).collect();
        assert_eq!(stamps, vec![10.0, 12.5, 12.5, 13.0]);
    }

    #[test]
    fn test_negative_source_clamped_to_zero() {
        let clock = Clock::with_source(|| -5.0);
        assert_eq!(clock.now_secs(), 0.0);
    }
}
