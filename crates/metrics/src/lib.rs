//! Pulse - Metrics
//!
//! In-process metrics registry for periodic reporting.
//!
//! # Overview
//!
//! This crate provides the five classic metric kinds and a registry to hold
//! them:
//! - [`Counter`]: an adjustable integer accumulator
//! - [`Gauge`]: an instantaneous value supplied by caller code
//! - [`Histogram`]: a distribution of observed values with percentile snapshots
//! - [`Meter`]: an event rate over 1/5/15-minute moving windows
//! - [`Timer`]: a histogram of durations combined with a meter of occurrences
//!
//! # Design Principles
//!
//! - **Lock-free where possible**: counters and counts use atomic operations
//! - **Snapshot-based reads**: every kind exposes a point-in-time snapshot
//!   that reporting code consumes; live metrics are never formatted directly
//! - **Injectable time**: meters and timers take their wall clock from the
//!   [`Clock`] trait so rate decay is deterministic under test
//! - **Ordered access**: the registry hands out `BTreeMap`s, so iteration
//!   order is stable across reporting cycles
//!
//! # Example
//!
//! ```
//! use pulse_metrics::{MetricRegistry, MetricValue};
//!
//! let registry = MetricRegistry::new();
//! registry.counter("requests").inc();
//! registry.register_gauge("queue.depth", || MetricValue::Integer(42));
//! registry.histogram("payload.bytes").update(512);
//!
//! let filter = pulse_metrics::accept_all();
//! assert_eq!(registry.counters(&filter).len(), 1);
//! ```

mod clock;
mod counter;
mod gauge;
mod histogram;
mod meter;
mod registry;
mod snapshot;
mod timer;
mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::{Histogram, DEFAULT_WINDOW};
pub use meter::{Meter, MeterSnapshot};
pub use registry::{accept_all, MetricFilter, MetricRegistry};
pub use snapshot::DistributionSnapshot;
pub use timer::{Timer, TimerSnapshot};
pub use value::MetricValue;
