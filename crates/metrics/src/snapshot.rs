//! Distribution statistics.

use serde::Serialize;

/// Point-in-time statistical summary of a set of observed values.
///
/// Percentiles use linear interpolation between the two nearest ranks;
/// the standard deviation is the sample (n-1) form. An empty distribution
/// snapshots to all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DistributionSnapshot {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub stddev: f64,
    pub median: f64,
    pub p75: f64,
    pub p95: f64,
    pub p98: f64,
    pub p99: f64,
    pub p999: f64,
}

impl DistributionSnapshot {
    /// Compute the summary of `values`. Order of the input does not matter.
    pub fn from_values(mut values: Vec<i64>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        values.sort_unstable();

        let n = values.len();
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
        let stddev = if n <= 1 {
            0.0
        } else {
            let variance = values
                .iter()
                .map(|&v| {
                    let d = v as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / (n - 1) as f64;
            variance.sqrt()
        };

        Self {
            min: values[0],
            max: values[n - 1],
            mean,
            stddev,
            median: quantile(&values, 0.5),
            p75: quantile(&values, 0.75),
            p95: quantile(&values, 0.95),
            p98: quantile(&values, 0.98),
            p99: quantile(&values, 0.99),
            p999: quantile(&values, 0.999),
        }
    }
}

/// Interpolated quantile of sorted `values` at `q` in (0, 1).
fn quantile(values: &[i64], q: f64) -> f64 {
    let n = values.len();
    let pos = q * (n + 1) as f64;
    if pos < 1.0 {
        return values[0] as f64;
    }
    if pos >= n as f64 {
        return values[n - 1] as f64;
    }
    let lower = values[pos as usize - 1] as f64;
    let upper = values[pos as usize] as f64;
    lower + (pos - pos.floor()) * (upper - lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_is_zeroed() {
        let snap = DistributionSnapshot::from_values(vec![]);
        assert_eq!(snap, DistributionSnapshot::default());
    }

    #[test]
    fn test_single_value() {
        let snap = DistributionSnapshot::from_values(vec![7]);
        assert_eq!(snap.min, 7);
        assert_eq!(snap.max, 7);
        assert_eq!(snap.mean, 7.0);
        assert_eq!(snap.stddev, 0.0);
        assert_eq!(snap.median, 7.0);
        assert_eq!(snap.p999, 7.0);
    }

    #[test]
    fn test_small_distribution() {
        let snap = DistributionSnapshot::from_values(vec![5, 1, 4, 2, 3]);
        assert_eq!(snap.min, 1);
        assert_eq!(snap.max, 5);
        assert_eq!(snap.mean, 3.0);
        assert!((snap.stddev - 2.5f64.sqrt()).abs() < 1e-9);
        assert_eq!(snap.median, 3.0);
        // pos = 0.75 * 6 = 4.5, halfway between 4 and 5
        assert_eq!(snap.p75, 4.5);
        // beyond the last rank, clamps to max
        assert_eq!(snap.p99, 5.0);
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let a = DistributionSnapshot::from_values(vec![10, 20, 30]);
        let b = DistributionSnapshot::from_values(vec![30, 10, 20]);
        assert_eq!(a, b);
    }
}
