//! Duration timer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::{Clock, DistributionSnapshot, Histogram, Meter};

/// A histogram of event durations plus a meter of event occurrences.
///
/// Durations are recorded in nanoseconds; the occurrence rates are
/// per-second. Unit conversion is the reporter's job, not the timer's.
#[derive(Debug)]
pub struct Timer {
    meter: Meter,
    histogram: Histogram,
}

impl Timer {
    /// Create a timer reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            meter: Meter::new(clock),
            histogram: Histogram::new(),
        }
    }

    /// Record one event of the given duration
    pub fn update(&self, duration: Duration) {
        self.histogram.update(duration.as_nanos() as i64);
        self.meter.mark();
    }

    /// Time a closure and record its duration
    pub fn time<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let out = f();
        self.update(start.elapsed());
        out
    }

    /// Total events since creation
    #[inline]
    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    /// Point-in-time durations and rates
    pub fn snapshot(&self) -> TimerSnapshot {
        let rates = self.meter.snapshot();
        TimerSnapshot {
            count: self.count(),
            durations: self.histogram.snapshot(),
            mean_rate: rates.mean_rate,
            m1_rate: rates.m1_rate,
            m5_rate: rates.m5_rate,
            m15_rate: rates.m15_rate,
        }
    }
}

/// Point-in-time snapshot of a timer.
///
/// `durations` is in nanoseconds; rates are per-second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub count: u64,
    pub durations: DistributionSnapshot,
    pub mean_rate: f64,
    pub m1_rate: f64,
    pub m5_rate: f64,
    pub m15_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    #[test]
    fn test_update_records_nanoseconds() {
        let clock = Arc::new(ManualClock::new(0));
        let timer = Timer::new(clock);

        timer.update(Duration::from_millis(2));
        timer.update(Duration::from_millis(4));

        assert_eq!(timer.count(), 2);
        let snap = timer.snapshot();
        assert_eq!(snap.durations.min, 2_000_000);
        assert_eq!(snap.durations.max, 4_000_000);
    }

    #[test]
    fn test_time_closure_returns_value() {
        let clock = Arc::new(ManualClock::new(0));
        let timer = Timer::new(clock);

        let out = timer.time(|| 42);
        assert_eq!(out, 42);
        assert_eq!(timer.count(), 1);
    }
}
