//! Metric value type.
//!
//! Every metric ultimately reads out as a number. Integral readings (counts,
//! raw gauge values) and floating-point readings (rates, statistics) are kept
//! as distinct variants so counts stay exact on the wire.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single numeric metric reading.
///
/// Serializes untagged, so a value is a bare JSON number. Equality and
/// hashing are exact: floats compare by bit pattern, which lets datapoints
/// carrying a value live in hashed sets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Integral reading (counts, integer gauges)
    Integer(i64),
    /// Floating-point reading (rates, durations, statistics)
    Float(f64),
}

impl MetricValue {
    /// Numeric value as a float, regardless of variant
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Integer(v) => *v as f64,
            MetricValue::Float(v) => *v,
        }
    }
}

impl PartialEq for MetricValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MetricValue::Integer(a), MetricValue::Integer(b)) => a == b,
            (MetricValue::Float(a), MetricValue::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for MetricValue {}

impl Hash for MetricValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            MetricValue::Integer(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            MetricValue::Float(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_bare_numbers() {
        assert_eq!(
            serde_json::to_string(&MetricValue::Integer(42)).unwrap(),
            "42"
        );
        assert_eq!(
            serde_json::to_string(&MetricValue::Float(1.5)).unwrap(),
            "1.5"
        );
    }

    #[test]
    fn test_deserialize_keeps_variant() {
        let int: MetricValue = serde_json::from_str("42").unwrap();
        assert_eq!(int, MetricValue::Integer(42));

        let float: MetricValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(float, MetricValue::Float(1.5));
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(MetricValue::Integer(2), MetricValue::Integer(2));
        assert_ne!(MetricValue::Integer(2), MetricValue::Float(2.0));
        assert_eq!(MetricValue::Float(0.1), MetricValue::Float(0.1));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(MetricValue::Integer(3).as_f64(), 3.0);
        assert_eq!(MetricValue::Float(2.5).as_f64(), 2.5);
    }
}
