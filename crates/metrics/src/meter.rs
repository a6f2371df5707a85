//! Event rate over exponentially-weighted moving windows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::Clock;

/// Window update interval. Rates decay in steps of this size.
const TICK_INTERVAL_MS: u64 = 5_000;
const TICK_INTERVAL_SECS: f64 = 5.0;

/// Exponentially-weighted moving average over a fixed window.
///
/// Rates are per-second. The average only moves on [`Ewma::tick`], which the
/// owning meter calls once per elapsed 5-second interval.
#[derive(Debug)]
struct Ewma {
    alpha: f64,
    uncounted: u64,
    rate: f64,
    initialized: bool,
}

impl Ewma {
    fn with_window_minutes(minutes: f64) -> Self {
        Self {
            alpha: 1.0 - (-TICK_INTERVAL_SECS / 60.0 / minutes).exp(),
            uncounted: 0,
            rate: 0.0,
            initialized: false,
        }
    }

    fn one_minute() -> Self {
        Self::with_window_minutes(1.0)
    }

    fn five_minutes() -> Self {
        Self::with_window_minutes(5.0)
    }

    fn fifteen_minutes() -> Self {
        Self::with_window_minutes(15.0)
    }

    fn update(&mut self, n: u64) {
        self.uncounted += n;
    }

    fn tick(&mut self) {
        let instant_rate = std::mem::take(&mut self.uncounted) as f64 / TICK_INTERVAL_SECS;
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }

    /// Events per second
    fn rate(&self) -> f64 {
        self.rate
    }
}

/// Measures the rate at which events occur.
///
/// Exposes a lifetime mean rate plus 1/5/15-minute moving averages, all in
/// events per second. Time comes from the injected [`Clock`].
pub struct Meter {
    count: AtomicU64,
    start_ms: u64,
    last_tick_ms: AtomicU64,
    windows: Mutex<[Ewma; 3]>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Meter")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

impl Meter {
    /// Create a meter reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_millis();
        Self {
            count: AtomicU64::new(0),
            start_ms: now,
            last_tick_ms: AtomicU64::new(now),
            windows: Mutex::new([Ewma::one_minute(), Ewma::five_minutes(), Ewma::fifteen_minutes()]),
            clock,
        }
    }

    /// Record one event
    pub fn mark(&self) {
        self.mark_n(1);
    }

    /// Record `n` events
    pub fn mark_n(&self, n: u64) {
        self.tick_if_necessary();
        self.count.fetch_add(n, Ordering::Relaxed);
        let mut windows = self.windows.lock();
        for window in windows.iter_mut() {
            window.update(n);
        }
    }

    /// Total events since creation
    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Lifetime mean rate in events per second
    pub fn mean_rate(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let elapsed_secs = self.clock.now_millis().saturating_sub(self.start_ms) as f64 / 1000.0;
        if elapsed_secs == 0.0 {
            0.0
        } else {
            count as f64 / elapsed_secs
        }
    }

    /// Point-in-time rates, decayed up to the current clock reading
    pub fn snapshot(&self) -> MeterSnapshot {
        self.tick_if_necessary();
        let windows = self.windows.lock();
        MeterSnapshot {
            count: self.count(),
            mean_rate: self.mean_rate(),
            m1_rate: windows[0].rate(),
            m5_rate: windows[1].rate(),
            m15_rate: windows[2].rate(),
        }
    }

    /// Apply any whole 5-second intervals that elapsed since the last tick.
    fn tick_if_necessary(&self) {
        let now = self.clock.now_millis();
        let last = self.last_tick_ms.load(Ordering::Acquire);
        let age = now.saturating_sub(last);
        if age < TICK_INTERVAL_MS {
            return;
        }
        // Land the new tick on an interval boundary so partial intervals
        // carry over to the next tick.
        let new_last = now - age % TICK_INTERVAL_MS;
        if self
            .last_tick_ms
            .compare_exchange(last, new_last, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            let ticks = age / TICK_INTERVAL_MS;
            let mut windows = self.windows.lock();
            for _ in 0..ticks {
                for window in windows.iter_mut() {
                    window.tick();
                }
            }
        }
    }
}

/// Point-in-time snapshot of a meter. All rates are per-second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MeterSnapshot {
    pub count: u64,
    pub mean_rate: f64,
    pub m1_rate: f64,
    pub m5_rate: f64,
    pub m15_rate: f64,
}
