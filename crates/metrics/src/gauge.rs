//! Instantaneous gauge.

use crate::MetricValue;

/// A metric whose value is computed by caller code at read time.
///
/// Any `Fn() -> MetricValue` closure is a gauge, so the common case is
/// registering a closure over some shared state:
///
/// ```
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
/// use pulse_metrics::{Gauge, MetricValue};
///
/// let depth = Arc::new(AtomicI64::new(0));
/// let gauge = {
///     let depth = Arc::clone(&depth);
///     move || MetricValue::Integer(depth.load(Ordering::Relaxed))
/// };
/// depth.store(7, Ordering::Relaxed);
/// assert_eq!(gauge.value(), MetricValue::Integer(7));
/// ```
pub trait Gauge: Send + Sync {
    /// Read the current value
    fn value(&self) -> MetricValue;
}

impl<F> Gauge for F
where
    F: Fn() -> MetricValue + Send + Sync,
{
    #[inline]
    fn value(&self) -> MetricValue {
        self()
    }
}
