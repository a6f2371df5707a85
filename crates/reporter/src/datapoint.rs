//! Outbound datapoint.
//!
//! The flat unit handed to the time-series database: one name, one numeric
//! value, one timestamp, one tag map. Matches the body shape of OpenTSDB's
//! `/api/put`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pulse_metrics::MetricValue;

/// One datapoint destined for the time-series database.
///
/// Identity covers every field, so a cycle's `HashSet<Datapoint>` collapses
/// datapoints that are identical on all of name, timestamp, value and tags,
/// and keeps everything else distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Datapoint {
    /// Fully resolved metric name, suffix included
    pub metric: String,

    /// Epoch seconds; identical across all datapoints of one cycle
    pub timestamp: u64,

    /// Numeric reading
    pub value: MetricValue,

    /// Tags attached to this datapoint; identical across a cycle
    pub tags: BTreeMap<String, String>,
}
