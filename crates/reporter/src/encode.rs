//! Snapshot formatter
//!
//! Projects one metric snapshot into its fixed set of suffixed datapoints.
//!
//! # Suffix table
//!
//! | Kind      | Datapoints |
//! |-----------|------------|
//! | Gauge     | bare name |
//! | Counter   | `.count` |
//! | Histogram | `.count` `.max` `.mean` `.min` `.stddev` `.median` `.p75` `.p95` `.p98` `.p99` `.p999` |
//! | Meter     | `.count` `.mean_rate` `.m1` `.m5` `.m15` |
//! | Timer     | histogram suffixes (duration-scaled) + meter rate suffixes (rate-scaled) |
//!
//! Rates are internally per-second and multiplied by the configured rate
//! unit's factor; durations are internally nanoseconds and multiplied by
//! the configured duration unit's factor. Counts and raw histogram
//! magnitudes are never converted.

use std::collections::{BTreeMap, HashSet};

use pulse_metrics::{DistributionSnapshot, MeterSnapshot, MetricValue, TimerSnapshot};

use crate::config::ReporterConfig;
use crate::datapoint::Datapoint;
use crate::name::NameResolver;

/// A metric reading of any kind, ready to format.
///
/// The formatter is pure over this value: the same snapshot at the same
/// timestamp always yields the same datapoints.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSnapshot {
    /// Raw gauge reading
    Gauge(MetricValue),
    /// Counter count
    Counter(i64),
    /// Total count plus distribution of raw magnitudes
    Histogram {
        count: u64,
        values: DistributionSnapshot,
    },
    /// Count plus per-second rates
    Meter(MeterSnapshot),
    /// Count, nanosecond durations, per-second rates
    Timer(TimerSnapshot),
}

/// Formats metric snapshots into datapoints under one configuration.
#[derive(Debug, Clone)]
pub struct DatapointEncoder {
    resolver: NameResolver,
    tags: BTreeMap<String, String>,
    rate_factor: f64,
    duration_factor: f64,
}

impl DatapointEncoder {
    pub fn new(config: &ReporterConfig) -> Self {
        Self {
            resolver: NameResolver::new(config.prefix.clone(), config.keep_last_segments),
            tags: config.tags.clone(),
            rate_factor: config.rate_unit.rate_factor(),
            duration_factor: config.duration_unit.duration_factor(),
        }
    }

    /// Format one metric into `out`, stamped with `timestamp`
    pub fn encode(
        &self,
        raw_name: &str,
        snapshot: &MetricSnapshot,
        timestamp: u64,
        out: &mut HashSet<Datapoint>,
    ) {
        let base = self.resolver.resolve(raw_name);
        match snapshot {
            MetricSnapshot::Gauge(value) => {
                out.insert(self.point(base, *value, timestamp));
            }
            MetricSnapshot::Counter(count) => {
                out.insert(self.suffixed(&base, "count", MetricValue::Integer(*count), timestamp));
            }
            MetricSnapshot::Histogram { count, values } => {
                out.insert(self.suffixed(
                    &base,
                    "count",
                    MetricValue::Integer(*count as i64),
                    timestamp,
                ));
                out.insert(self.suffixed(&base, "max", MetricValue::Integer(values.max), timestamp));
                out.insert(self.suffixed(&base, "min", MetricValue::Integer(values.min), timestamp));
                for (suffix, value) in Self::float_stats(values) {
                    out.insert(self.suffixed(&base, suffix, MetricValue::Float(value), timestamp));
                }
            }
            MetricSnapshot::Meter(meter) => {
                out.insert(self.suffixed(
                    &base,
                    "count",
                    MetricValue::Integer(meter.count as i64),
                    timestamp,
                ));
                let rates = [meter.mean_rate, meter.m1_rate, meter.m5_rate, meter.m15_rate];
                self.rates(&base, rates, timestamp, out);
            }
            MetricSnapshot::Timer(timer) => {
                out.insert(self.suffixed(
                    &base,
                    "count",
                    MetricValue::Integer(timer.count as i64),
                    timestamp,
                ));
                let durations = &timer.durations;
                for (suffix, nanos) in [
                    ("max", durations.max as f64),
                    ("min", durations.min as f64),
                ] {
                    out.insert(self.suffixed(
                        &base,
                        suffix,
                        MetricValue::Float(nanos * self.duration_factor),
                        timestamp,
                    ));
                }
                for (suffix, nanos) in Self::float_stats(durations) {
                    out.insert(self.suffixed(
                        &base,
                        suffix,
                        MetricValue::Float(nanos * self.duration_factor),
                        timestamp,
                    ));
                }
                let rates = [timer.mean_rate, timer.m1_rate, timer.m5_rate, timer.m15_rate];
                self.rates(&base, rates, timestamp, out);
            }
        }
    }

    /// The float-valued distribution statistics shared by histograms and
    /// timers; `min`/`max` are handled per-kind because only timers scale
    /// them.
    fn float_stats(values: &DistributionSnapshot) -> [(&'static str, f64); 8] {
        [
            ("mean", values.mean),
            ("stddev", values.stddev),
            ("median", values.median),
            ("p75", values.p75),
            ("p95", values.p95),
            ("p98", values.p98),
            ("p99", values.p99),
            ("p999", values.p999),
        ]
    }

    /// Rate datapoints in `mean_rate, m1, m5, m15` order
    fn rates(&self, base: &str, rates: [f64; 4], timestamp: u64, out: &mut HashSet<Datapoint>) {
        for (suffix, rate) in ["mean_rate", "m1", "m5", "m15"].into_iter().zip(rates) {
            out.insert(self.suffixed(
                base,
                suffix,
                MetricValue::Float(rate * self.rate_factor),
                timestamp,
            ));
        }
    }

    fn suffixed(&self, base: &str, suffix: &str, value: MetricValue, timestamp: u64) -> Datapoint {
        self.point(format!("{base}.{suffix}"), value, timestamp)
    }

    fn point(&self, metric: String, value: MetricValue, timestamp: u64) -> Datapoint {
        Datapoint {
            metric,
            timestamp,
            value,
            tags: self.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;

    const TIMESTAMP: u64 = 1000198;

    fn test_config() -> ReporterConfig {
        ReporterConfig {
            prefix: "prefix".to_string(),
            tags: BTreeMap::from([("foo".to_string(), "bar".to_string())]),
            ..ReporterConfig::default()
        }
    }

    fn encode(snapshot: MetricSnapshot, name: &str, config: &ReporterConfig) -> HashSet<Datapoint> {
        let encoder = DatapointEncoder::new(config);
        let mut out = HashSet::new();
        encoder.encode(name, &snapshot, TIMESTAMP, &mut out);
        out
    }

    fn by_name(points: &HashSet<Datapoint>) -> BTreeMap<String, MetricValue> {
        points
            .iter()
            .map(|p| (p.metric.clone(), p.value))
            .collect()
    }

    fn fixture_distribution() -> DistributionSnapshot {
        DistributionSnapshot {
            max: 2,
            mean: 3.0,
            min: 4,
            stddev: 5.0,
            median: 6.0,
            p75: 7.0,
            p95: 8.0,
            p98: 9.0,
            p99: 10.0,
            p999: 11.0,
        }
    }

    #[test]
    fn test_gauge_is_one_bare_datapoint() {
        let points = encode(
            MetricSnapshot::Gauge(MetricValue::Integer(1)),
            "gauge",
            &test_config(),
        );
        assert_eq!(points.len(), 1);

        let point = points.iter().next().unwrap();
        assert_eq!(point.metric, "prefix.gauge");
        assert_eq!(point.value, MetricValue::Integer(1));
        assert_eq!(point.timestamp, TIMESTAMP);
        assert_eq!(point.tags["foo"], "bar");
    }

    #[test]
    fn test_counter_is_one_count_datapoint() {
        let points = encode(MetricSnapshot::Counter(2), "counter", &test_config());
        assert_eq!(points.len(), 1);

        let point = points.iter().next().unwrap();
        assert_eq!(point.metric, "prefix.counter.count");
        assert_eq!(point.value, MetricValue::Integer(2));
        assert_eq!(point.timestamp, TIMESTAMP);
    }

    #[test]
    fn test_histogram_emits_eleven_raw_datapoints() {
        let points = encode(
            MetricSnapshot::Histogram {
                count: 1,
                values: fixture_distribution(),
            },
            "histogram",
            &test_config(),
        );
        assert_eq!(points.len(), 11);
        assert!(points.iter().all(|p| p.timestamp == TIMESTAMP));

        let values = by_name(&points);
        assert_eq!(values["prefix.histogram.count"], MetricValue::Integer(1));
        assert_eq!(values["prefix.histogram.max"], MetricValue::Integer(2));
        assert_eq!(values["prefix.histogram.mean"], MetricValue::Float(3.0));
        assert_eq!(values["prefix.histogram.min"], MetricValue::Integer(4));
        assert_eq!(values["prefix.histogram.stddev"], MetricValue::Float(5.0));
        assert_eq!(values["prefix.histogram.median"], MetricValue::Float(6.0));
        assert_eq!(values["prefix.histogram.p75"], MetricValue::Float(7.0));
        assert_eq!(values["prefix.histogram.p95"], MetricValue::Float(8.0));
        assert_eq!(values["prefix.histogram.p98"], MetricValue::Float(9.0));
        assert_eq!(values["prefix.histogram.p99"], MetricValue::Float(10.0));
        assert_eq!(values["prefix.histogram.p999"], MetricValue::Float(11.0));
    }

    #[test]
    fn test_meter_emits_five_datapoints_rates_unconverted() {
        let points = encode(
            MetricSnapshot::Meter(MeterSnapshot {
                count: 1,
                mean_rate: 1.0,
                m1_rate: 2.0,
                m5_rate: 3.0,
                m15_rate: 4.0,
            }),
            "meter",
            &test_config(),
        );
        assert_eq!(points.len(), 5);

        let values = by_name(&points);
        assert_eq!(values["prefix.meter.count"], MetricValue::Integer(1));
        assert_eq!(values["prefix.meter.mean_rate"], MetricValue::Float(1.0));
        assert_eq!(values["prefix.meter.m1"], MetricValue::Float(2.0));
        assert_eq!(values["prefix.meter.m5"], MetricValue::Float(3.0));
        assert_eq!(values["prefix.meter.m15"], MetricValue::Float(4.0));
    }

    #[test]
    fn test_meter_rates_convert_to_minutes() {
        let config = ReporterConfig {
            rate_unit: TimeUnit::Minutes,
            ..test_config()
        };
        let points = encode(
            MetricSnapshot::Meter(MeterSnapshot {
                count: 1,
                mean_rate: 1.0,
                m1_rate: 2.0,
                m5_rate: 3.0,
                m15_rate: 4.0,
            }),
            "meter",
            &config,
        );

        let values = by_name(&points);
        assert_eq!(values["prefix.meter.mean_rate"], MetricValue::Float(60.0));
        assert_eq!(values["prefix.meter.m1"], MetricValue::Float(120.0));
        // count is never rate-converted
        assert_eq!(values["prefix.meter.count"], MetricValue::Integer(1));
    }

    #[test]
    fn test_timer_emits_fifteen_datapoints_durations_scaled() {
        let points = encode(
            MetricSnapshot::Timer(TimerSnapshot {
                count: 1,
                durations: fixture_distribution(),
                mean_rate: 1.0,
                m1_rate: 2.0,
                m5_rate: 3.0,
                m15_rate: 4.0,
            }),
            "timer",
            &test_config(),
        );
        assert_eq!(points.len(), 15);
        assert!(points.iter().all(|p| p.timestamp == TIMESTAMP));

        let values = by_name(&points);
        assert_eq!(values["prefix.timer.count"], MetricValue::Integer(1));

        // nanosecond durations under the milliseconds unit scale by 1e-6
        let scaled = [
            ("prefix.timer.max", 2e-6),
            ("prefix.timer.mean", 3e-6),
            ("prefix.timer.min", 4e-6),
            ("prefix.timer.stddev", 5e-6),
            ("prefix.timer.median", 6e-6),
            ("prefix.timer.p75", 7e-6),
            ("prefix.timer.p95", 8e-6),
            ("prefix.timer.p98", 9e-6),
            ("prefix.timer.p99", 10e-6),
            ("prefix.timer.p999", 11e-6),
        ];
        for (name, expected) in scaled {
            assert!(
                (values[name].as_f64() - expected).abs() < 1e-12,
                "{name}: {:?}",
                values[name]
            );
        }

        // rates stay per-second under the seconds unit
        assert_eq!(values["prefix.timer.mean_rate"], MetricValue::Float(1.0));
        assert_eq!(values["prefix.timer.m1"], MetricValue::Float(2.0));
        assert_eq!(values["prefix.timer.m5"], MetricValue::Float(3.0));
        assert_eq!(values["prefix.timer.m15"], MetricValue::Float(4.0));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let snapshot = MetricSnapshot::Timer(TimerSnapshot {
            count: 9,
            durations: fixture_distribution(),
            mean_rate: 1.5,
            m1_rate: 2.5,
            m5_rate: 3.5,
            m15_rate: 4.5,
        });
        let first = encode(snapshot.clone(), "timer", &test_config());
        let second = encode(snapshot, "timer", &test_config());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_prefix_leaves_names_bare() {
        let config = ReporterConfig {
            tags: BTreeMap::new(),
            ..ReporterConfig::default()
        };
        let points = encode(MetricSnapshot::Counter(7), "jobs", &config);
        let point = points.iter().next().unwrap();
        assert_eq!(point.metric, "jobs.count");
        assert!(point.tags.is_empty());
    }
}
