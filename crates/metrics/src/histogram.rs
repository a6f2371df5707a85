//! Value distribution over a sliding window.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::DistributionSnapshot;

/// Default number of recent observations retained for statistics
pub const DEFAULT_WINDOW: usize = 1028;

/// Tracks a distribution of observed values.
///
/// The total observation count is unbounded; the statistical snapshot is
/// computed over the most recent [`DEFAULT_WINDOW`] observations.
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    window: Mutex<VecDeque<i64>>,
    capacity: usize,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create a histogram with the default window size
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Create a histogram retaining the last `capacity` observations
    pub fn with_window(capacity: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            window: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record an observation
    pub fn update(&self, value: i64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut window = self.window.lock();
        if window.len() == self.capacity {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Total observations since creation
    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Statistical summary of the current window
    pub fn snapshot(&self) -> DistributionSnapshot {
        let values: Vec<i64> = self.window.lock().iter().copied().collect();
        DistributionSnapshot::from_values(values)
    }
}
