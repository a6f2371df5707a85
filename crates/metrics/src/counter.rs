//! Adjustable counter.

use std::sync::atomic::{AtomicI64, Ordering};

/// An integer accumulator that can move in both directions.
///
/// All operations use relaxed atomic ordering; a counter is a statistic,
/// not a synchronization primitive.
#[derive(Debug, Default)]
pub struct Counter(AtomicI64);

impl Counter {
    /// Create a new counter initialized to 0
    #[inline]
    pub const fn new() -> Self {
        Self(AtomicI64::new(0))
    }

    /// Increment the counter by 1
    #[inline]
    pub fn inc(&self) {
        self.add(1);
    }

    /// Decrement the counter by 1
    #[inline]
    pub fn dec(&self) {
        self.add(-1);
    }

    /// Adjust the counter by `delta` (may be negative)
    #[inline]
    pub fn add(&self, delta: i64) {
        self.0.fetch_add(delta, Ordering::Relaxed);
    }

    /// Get the current count
    #[inline]
    pub fn count(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_zero() {
        assert_eq!(Counter::new().count(), 0);
    }

    #[test]
    fn test_counter_adjusts_both_ways() {
        let counter = Counter::new();
        counter.inc();
        counter.inc();
        counter.add(5);
        counter.dec();
        assert_eq!(counter.count(), 6);

        counter.add(-10);
        assert_eq!(counter.count(), -4);
    }
}
