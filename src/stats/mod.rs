//! # Descriptive statistics
//!
//! [`compute_stats`] summarises a list of numbers in one pass over a sorted
//! copy; [`DataSet`] holds the numbers the user has entered so far.
//!
//! Quartiles use the nearest-rank rule `q1 = sorted[n / 4]`,
//! `q3 = sorted[3n / 4]` without interpolation, and the variance is the
//! population variance (divided by `n`).
//!
//! ```rust
//! use loancalc::stats::compute_stats;
//!
//! let stats = compute_stats(&[5.0, 10.0, 15.0]).unwrap();
//! assert_eq!(stats.mean, 10.0);
//! assert_eq!(stats.median, 10.0);
//! assert!(stats.mode.is_empty());
//! assert_eq!(stats.range, 10.0);
//! assert!((stats.variance - 50.0 / 3.0).abs() < 1e-12);
//! ```

pub mod dataset;

use std::fmt;

use itertools::Itertools;
use log::debug;
use serde::Serialize;
use thiserror::Error;

pub use dataset::DataSet;

use crate::expression::NumericConstantError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("Please enter at least one number")]
    EmptyInput,
    #[error("Value {value} at position {index} is not a finite number")]
    NonFinite { index: usize, value: f64 },
    #[error("The values are too large to summarise")]
    Overflow,
    #[error("'{token}' is not a number: {source}")]
    NotANumber {
        token: String,
        source: NumericConstantError,
    },
    #[error("No values found in the input")]
    NoValues,
    #[error("No value at position {index} (the data set has {len} values)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Summary statistics of a non-empty list of numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatResult {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent values in ascending order; empty when no value repeats.
    pub mode: Vec<f64>,
    /// Population variance. Zero when all values are equal, and also when
    /// the spread is so small that its square is below the smallest
    /// positive `f64` (e.g. `[0, 1e-200]`); `std_dev` stays exact there.
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Computes the summary statistics of `values`.
///
/// The result depends only on the multiset of values, never on their order.
pub fn compute_stats(values: &[f64]) -> Result<StatResult, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if let Some((index, &value)) = values.iter().find_position(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite { index, value });
    }

    let sorted: Vec<f64> = values.iter().copied().sorted_by(f64::total_cmp).collect();
    let count = sorted.len();
    let n = count as f64;
    let min = sorted[0];
    let max = sorted[count - 1];

    let sum: f64 = sorted.iter().sum();
    let (mean, variance, std_dev) = if min == max {
        // Identical values: avoid rounding noise from sum / n
        (min, 0.0, 0.0)
    } else {
        let mean = sum / n;
        // Deviations are scaled by the range so tiny spreads do not
        // underflow when squared.
        let range = max - min;
        let scaled = sorted
            .iter()
            .map(|v| ((v - mean) / range).powi(2))
            .sum::<f64>()
            / n;
        (mean, scaled * range * range, scaled.sqrt() * range)
    };
    if !sum.is_finite() || !variance.is_finite() {
        return Err(StatsError::Overflow);
    }

    let median = if count % 2 == 0 {
        f64::midpoint(sorted[count / 2 - 1], sorted[count / 2])
    } else {
        sorted[count / 2]
    };

    let q1 = sorted[count / 4];
    let q3 = sorted[3 * count / 4];

    let result = StatResult {
        count,
        sum,
        mean,
        median,
        mode: mode(&sorted),
        variance,
        std_dev,
        min,
        max,
        range: max - min,
        q1,
        q3,
        iqr: q3 - q1,
    };
    debug!("Computed statistics of {} values: {:?}", count, result);
    Ok(result)
}

/// All values sharing the highest count, when that count exceeds one.
fn mode(sorted: &[f64]) -> Vec<f64> {
    let counts: Vec<(usize, f64)> = sorted.iter().copied().dedup_with_count().collect();
    let highest = counts.iter().map(|(count, _)| *count).max().unwrap_or(0);
    if highest <= 1 {
        return Vec::new();
    }
    counts
        .into_iter()
        .filter(|(count, _)| *count == highest)
        .map(|(_, value)| value)
        .collect()
}

impl StatResult {
    /// Multi-line summary with every figure to two decimals.
    pub fn report(&self) -> String {
        let mode = if self.mode.is_empty() {
            "none".to_string()
        } else {
            self.mode.iter().map(|v| format!("{:.2}", v)).join(", ")
        };
        let lines = [
            ("Count", self.count.to_string()),
            ("Sum", format!("{:.2}", self.sum)),
            ("Mean", format!("{:.2}", self.mean)),
            ("Median", format!("{:.2}", self.median)),
            ("Mode", mode),
            ("Variance", format!("{:.2}", self.variance)),
            ("Std Dev", format!("{:.2}", self.std_dev)),
            ("Min", format!("{:.2}", self.min)),
            ("Max", format!("{:.2}", self.max)),
            ("Range", format!("{:.2}", self.range)),
            ("Q1", format!("{:.2}", self.q1)),
            ("Q3", format!("{:.2}", self.q3)),
            ("IQR", format!("{:.2}", self.iqr)),
        ];
        lines
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .join("\n")
    }
}

impl fmt::Display for StatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_float_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_three_values() {
        let stats = compute_stats(&[5.0, 10.0, 15.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 30.0);
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.median, 10.0);
        assert!(stats.mode.is_empty());
        assert_float_eq(stats.variance, 50.0 / 3.0, 1e-12);
        assert_float_eq(stats.std_dev, 4.08, 0.005);
        assert_eq!((stats.min, stats.max, stats.range), (5.0, 15.0, 10.0));
    }

    #[test]
    fn test_even_count_median_and_quartiles() {
        let stats = compute_stats(&[8.0, 1.0, 4.0, 2.0, 7.0, 3.0, 6.0, 5.0]).unwrap();
        assert_eq!(stats.median, 4.5);
        // sorted[2] and sorted[6]
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.iqr, 4.0);
    }

    #[test]
    fn test_single_value() {
        let stats = compute_stats(&[42.0]).unwrap();
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.q1, 42.0);
        assert_eq!(stats.q3, 42.0);
        assert_eq!(stats.variance, 0.0);
        assert!(stats.mode.is_empty());
    }

    #[test]
    fn test_identical_values_have_exact_mean() {
        let stats = compute_stats(&[0.1, 0.1, 0.1]).unwrap();
        assert_eq!(stats.mean, 0.1);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.mode, vec![0.1]);
    }

    #[test]
    fn test_tiny_spread() {
        let stats = compute_stats(&[0.0, 1e-200]).unwrap();
        assert_float_eq(stats.std_dev / 5e-201, 1.0, 1e-12);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.range, 1e-200);

        let stats = compute_stats(&[0.0, 1e-150]).unwrap();
        assert!(stats.variance > 0.0);
        assert_float_eq(stats.variance / 2.5e-301, 1.0, 1e-12);
    }

    #[test]
    fn test_mode_lists_every_tie() {
        let stats = compute_stats(&[3.0, 1.0, 3.0, 2.0, 1.0, 4.0]).unwrap();
        assert_eq!(stats.mode, vec![1.0, 3.0]);

        let stats = compute_stats(&[2.0, 2.0, 2.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.mode, vec![2.0]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(compute_stats(&[]).unwrap_err(), StatsError::EmptyInput);
        assert!(matches!(
            compute_stats(&[1.0, f64::NAN]),
            Err(StatsError::NonFinite { index: 1, .. })
        ));
        assert_eq!(
            compute_stats(&[f64::MAX, f64::MAX]).unwrap_err(),
            StatsError::Overflow
        );
    }

    #[test]
    fn test_report() {
        let stats = compute_stats(&[5.0, 10.0, 15.0]).unwrap();
        let report = stats.report();
        assert!(report.starts_with("Count: 3\nSum: 30.00\nMean: 10.00\n"));
        assert!(report.contains("Mode: none"));
        assert!(report.contains("Variance: 16.67"));
        assert!(report.contains("Std Dev: 4.08"));
        assert!(report.ends_with("IQR: 10.00"));

        let stats = compute_stats(&[1.0, 1.0, 2.5]).unwrap();
        assert!(stats.to_string().contains("Mode: 1.00"));
    }
}
