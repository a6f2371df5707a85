//! Reporting cycle driver
//!
//! Pulls the five metric-kind maps from the registry on each tick, formats
//! every entry at a single timestamp, and ships the resulting set in
//! size-bounded batches.
//!
//! The driver holds no cross-cycle state: every cycle is computed fresh
//! from the registry's current values, so a failed cycle cannot corrupt
//! the next one. Failures inside a cycle (transport, serialization)
//! propagate out of [`Reporter::report_once`]; the scheduled loop logs
//! them and moves on to the next tick.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use pulse_metrics::{Clock, MetricRegistry, SystemClock};

use crate::config::ReporterConfig;
use crate::datapoint::Datapoint;
use crate::encode::{DatapointEncoder, MetricSnapshot};
use crate::error::ReportError;
use crate::transport::Transport;

/// Periodic metrics reporter.
///
/// Constructed once and reused across cycles; see the crate docs for the
/// full pipeline.
pub struct Reporter {
    config: ReporterConfig,
    encoder: DatapointEncoder,
    registry: Arc<MetricRegistry>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl Reporter {
    /// Create a reporter on the system clock.
    ///
    /// Rejects configs that cannot work at runtime (zero batch size,
    /// zero interval).
    pub fn new(
        config: ReporterConfig,
        registry: Arc<MetricRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ReportError> {
        Self::with_clock(config, registry, transport, Arc::new(SystemClock))
    }

    /// Create a reporter reading time from `clock`
    pub fn with_clock(
        config: ReporterConfig,
        registry: Arc<MetricRegistry>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ReportError> {
        config.validate()?;
        let encoder = DatapointEncoder::new(&config);
        Ok(Self {
            config,
            encoder,
            registry,
            transport,
            clock,
        })
    }

    /// Project the registry's current state at `timestamp` (epoch seconds).
    ///
    /// Pure given the registry state: entries failing the filter contribute
    /// nothing, everything else contributes its kind's datapoints.
    pub fn collect(&self, timestamp: u64) -> HashSet<Datapoint> {
        let mut out = HashSet::new();
        let filter = &self.config.filter;

        for (name, gauge) in self.registry.gauges(filter) {
            let snapshot = MetricSnapshot::Gauge(gauge.value());
            self.encoder.encode(&name, &snapshot, timestamp, &mut out);
        }
        for (name, counter) in self.registry.counters(filter) {
            let snapshot = MetricSnapshot::Counter(counter.count());
            self.encoder.encode(&name, &snapshot, timestamp, &mut out);
        }
        for (name, histogram) in self.registry.histograms(filter) {
            let snapshot = MetricSnapshot::Histogram {
                count: histogram.count(),
                values: histogram.snapshot(),
            };
            self.encoder.encode(&name, &snapshot, timestamp, &mut out);
        }
        for (name, meter) in self.registry.meters(filter) {
            let snapshot = MetricSnapshot::Meter(meter.snapshot());
            self.encoder.encode(&name, &snapshot, timestamp, &mut out);
        }
        for (name, timer) in self.registry.timers(filter) {
            let snapshot = MetricSnapshot::Timer(timer.snapshot());
            self.encoder.encode(&name, &snapshot, timestamp, &mut out);
        }

        out
    }

    /// Run one reporting cycle: one clock reading, one collection, one
    /// batched send. An empty cycle sends nothing.
    pub async fn report_once(&self) -> Result<(), ReportError> {
        let timestamp = self.clock.now_millis() / 1000;
        let datapoints = self.collect(timestamp);
        if datapoints.is_empty() {
            debug!("nothing to report");
            return Ok(());
        }

        let total = datapoints.len();
        let all: Vec<Datapoint> = datapoints.into_iter().collect();
        let batch_size = self.config.max_batch_size.unwrap_or(total);
        for batch in all.chunks(batch_size) {
            self.transport.send(batch).await?;
        }

        debug!(
            datapoints = total,
            batches = total.div_ceil(batch_size),
            "cycle reported"
        );
        Ok(())
    }

    /// Run the reporter until cancellation.
    ///
    /// Spawn this as a task. Ticks at the configured interval, skipping
    /// missed ticks; a failed cycle is logged and the loop continues.
    pub async fn run(self, cancel: CancellationToken) {
        if !self.config.enabled {
            info!("metrics reporting disabled");
            return;
        }

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            interval_secs = self.config.interval.as_secs(),
            prefix = %self.config.prefix,
            "metrics reporter started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("metrics reporter shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.report_once().await {
                        warn!(error = %e, "reporting cycle failed");
                    }
                }
            }
        }
    }
}
