//! Pulse - Reporter
//!
//! Periodically projects the state of a [`pulse_metrics::MetricRegistry`]
//! into flat OpenTSDB datapoints and ships them over HTTP.
//!
//! # Overview
//!
//! On every cycle the reporter:
//! 1. reads the clock once (all datapoints of the cycle share the second),
//! 2. pulls the five metric-kind maps from the registry under the configured
//!    name filter,
//! 3. resolves each name (optional dotted-path trimming, optional prefix),
//! 4. formats each metric's snapshot into suffixed datapoints (`.count`,
//!    `.max`, `.m1`, ...), converting rates and durations to the configured
//!    time units,
//! 5. partitions the accumulated set into batches and hands each batch to
//!    the transport.
//!
//! The projection itself is pure: given a snapshot, a config, and a clock
//! reading it always produces the same set, so overlapping cycles are safe.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pulse_metrics::MetricRegistry;
//! use pulse_reporter::{OpenTsdbClient, Reporter, ReporterConfig};
//!
//! # async fn demo() -> Result<(), pulse_reporter::ReportError> {
//! let registry = Arc::new(MetricRegistry::new());
//! registry.counter("requests").inc();
//!
//! let config = ReporterConfig {
//!     prefix: "myapp".to_string(),
//!     ..ReporterConfig::default()
//! };
//! let transport = Arc::new(OpenTsdbClient::new("http://localhost:4242"));
//! let reporter = Reporter::new(config, registry, transport)?;
//! reporter.report_once().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod datapoint;
mod encode;
mod error;
mod name;
mod reporter;
mod transport;

pub use config::{ReporterConfig, TimeUnit};
pub use datapoint::Datapoint;
pub use encode::{DatapointEncoder, MetricSnapshot};
pub use error::ReportError;
pub use name::NameResolver;
pub use reporter::Reporter;
pub use transport::{OpenTsdbClient, Transport, API_PUT_PATH};
