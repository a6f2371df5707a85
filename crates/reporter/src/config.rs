//! Reporter configuration
//!
//! Controls how registry state is projected into datapoints and how the
//! reporting loop is scheduled.
//!
//! # Defaults
//!
//! A default config reports everything, unmodified:
//! - `enabled`: true
//! - `interval`: 10s
//! - `prefix`: none
//! - `rate_unit`: seconds (rates pass through)
//! - `duration_unit`: milliseconds
//! - `keep_last_segments`: 0 (no name trimming)
//! - `max_batch_size`: none (one batch per cycle)
//! - `tags`: empty
//! - `filter`: accept all

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use pulse_metrics::{accept_all, MetricFilter};

use crate::error::ReportError;

/// Time unit for rate and duration conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Nanoseconds in one unit
    pub const fn nanos(self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    /// Factor applied to a per-second rate to express it per this unit
    /// (seconds → 1, minutes → 60)
    pub fn rate_factor(self) -> f64 {
        self.nanos() as f64 / 1e9
    }

    /// Factor applied to a nanosecond duration to express it in this unit
    /// (milliseconds → 1e-6)
    pub fn duration_factor(self) -> f64 {
        1.0 / self.nanos() as f64
    }
}

/// Reporter configuration
///
/// A plain immutable struct; construct it with named fields over
/// [`ReporterConfig::default`]. The filter is code, not configuration, so
/// it is skipped when deserializing.
///
/// # Example
///
/// ```toml
/// [reporter]
/// # All fields optional
/// enabled = true
/// interval = "10s"
/// prefix = "myapp"
/// rate_unit = "seconds"
/// duration_unit = "milliseconds"
/// keep_last_segments = 2
/// max_batch_size = 50
///
/// [reporter.tags]
/// host = "web-1"
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Enable periodic reporting
    /// Default: true
    pub enabled: bool,

    /// Reporting interval
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Prefix prepended (with a joining dot) to every metric name.
    /// Empty means no prefix.
    pub prefix: String,

    /// Unit rates are converted to.
    /// Default: seconds (internal rates are already per-second)
    pub rate_unit: TimeUnit,

    /// Unit durations are converted to.
    /// Default: milliseconds (internal durations are nanoseconds)
    pub duration_unit: TimeUnit,

    /// Tags attached to every datapoint
    pub tags: BTreeMap<String, String>,

    /// Keep only this many trailing dotted-path segments of each name.
    /// 0 disables trimming; names with no more segments than this are
    /// kept whole.
    pub keep_last_segments: usize,

    /// Upper bound on datapoints per transport call.
    /// None sends each cycle as a single batch.
    pub max_batch_size: Option<usize>,

    /// Name-based predicate selecting which registry entries are reported
    #[serde(skip)]
    pub filter: MetricFilter,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(10),
            prefix: String::new(),
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            tags: BTreeMap::new(),
            keep_last_segments: 0,
            max_batch_size: None,
            filter: accept_all(),
        }
    }
}

impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("enabled", &self.enabled)
            .field("interval", &self.interval)
            .field("prefix", &self.prefix)
            .field("rate_unit", &self.rate_unit)
            .field("duration_unit", &self.duration_unit)
            .field("tags", &self.tags)
            .field("keep_last_segments", &self.keep_last_segments)
            .field("max_batch_size", &self.max_batch_size)
            .finish_non_exhaustive()
    }
}

impl ReporterConfig {
    /// Check the config for values that cannot work at runtime
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.max_batch_size == Some(0) {
            return Err(ReportError::Config(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        if self.interval.is_zero() {
            return Err(ReportError::Config(
                "interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
