//! Contingency tables and the chi-squared test of independence.

use ndarray::Array2;

use rimfax_hal::Counts;

use crate::error::{VerifyError, VerifyResult};

/// Drop outcomes at or below a count threshold.
///
/// Used to strip sampling noise before comparing histograms: outcomes
/// that barely appear say nothing about the underlying distribution at
/// the shot counts involved.
pub fn filter_counts(counts: &Counts, threshold: u64) -> Counts {
    counts
        .iter()
        .filter(|(_, count)| *count > threshold)
        .map(|(bitstring, count)| (bitstring.to_string(), count))
        .collect()
}

/// A 2×k contingency table over a shared outcome support.
#[derive(Debug, Clone)]
pub struct ContingencyTable {
    /// Observed counts, rows = histograms, columns = outcomes.
    table: Array2<f64>,
    /// Outcome bitstrings in column order (sorted).
    keys: Vec<String>,
}

impl ContingencyTable {
    /// Build a table from two histograms.
    ///
    /// The histograms must cover exactly the same outcomes; a support
    /// mismatch means the distributions differ in kind, not degree, and
    /// no statistic is computed for it.
    pub fn from_counts(left: &Counts, right: &Counts) -> VerifyResult<Self> {
        let left_keys = left.sorted_keys();
        let right_keys = right.sorted_keys();
        if left_keys != right_keys {
            let left_only = left_keys
                .iter()
                .filter(|k| !right_keys.contains(k))
                .map(|k| k.to_string())
                .collect();
            let right_only = right_keys
                .iter()
                .filter(|k| !left_keys.contains(k))
                .map(|k| k.to_string())
                .collect();
            return Err(VerifyError::SupportMismatch {
                left_only,
                right_only,
            });
        }

        let k = left_keys.len();
        let mut table = Array2::zeros((2, k));
        for (col, key) in left_keys.iter().enumerate() {
            table[[0, col]] = left.get(key) as f64;
            table[[1, col]] = right.get(key) as f64;
        }
        Ok(Self {
            table,
            keys: left_keys.into_iter().map(String::from).collect(),
        })
    }

    /// Number of outcome columns.
    pub fn num_outcomes(&self) -> usize {
        self.keys.len()
    }

    /// Outcome bitstrings in column order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Outcome of a chi-squared test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chi2Outcome {
    /// The chi-squared statistic.
    pub statistic: f64,
    /// Degrees of freedom.
    pub dof: usize,
    /// Approximate p-value.
    pub p_value: f64,
}

/// Chi-squared test of independence on a 2×k contingency table.
///
/// Tests whether the two rows look like samples from one distribution.
/// With fewer than two outcome columns there is nothing to test and the
/// p-value is 1.0.
pub fn chi2_contingency(table: &ContingencyTable) -> Chi2Outcome {
    let k = table.num_outcomes();
    let dof = k.saturating_sub(1);

    let row_totals: Vec<f64> = (0..2).map(|r| table.table.row(r).sum()).collect();
    let col_totals: Vec<f64> = (0..k).map(|c| table.table.column(c).sum()).collect();
    let grand_total: f64 = row_totals.iter().sum();

    let mut statistic = 0.0;
    if grand_total > 0.0 {
        for r in 0..2 {
            for c in 0..k {
                let expected = row_totals[r] * col_totals[c] / grand_total;
                if expected > 0.0 {
                    let diff = table.table[[r, c]] - expected;
                    statistic += diff * diff / expected;
                }
            }
        }
    }

    Chi2Outcome {
        statistic,
        dof,
        p_value: chi_squared_p_value(statistic, dof),
    }
}

/// Upper-tail p-value of the chi-squared distribution.
///
/// Uses the Wilson-Hilferty cube-root normal approximation, which is
/// accurate to a few percent across the regime these tests operate in.
pub fn chi_squared_p_value(statistic: f64, dof: usize) -> f64 {
    if dof == 0 {
        return 1.0;
    }
    if statistic <= 0.0 {
        return 1.0;
    }

    let k = dof as f64;
    let term = 2.0 / (9.0 * k);
    let cube_root = (statistic / k).powf(1.0 / 3.0);
    let z = (cube_root - (1.0 - term)) / term.sqrt();

    1.0 - standard_normal_cdf(z)
}

/// Standard normal CDF via the Abramowitz-Stegun erf approximation.
fn standard_normal_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    // Constants for the approximation.
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let abs_x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + p * abs_x);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let erf_approx =
        1.0 - (a1 * t + a2 * t2 + a3 * t3 + a4 * t4 + a5 * t5) * (-abs_x * abs_x).exp();

    0.5 * (1.0 + sign * erf_approx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> Counts {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_filter_drops_rare_outcomes() {
        let filtered = filter_counts(&counts(&[("00", 55), ("11", 35), ("01", 10)]), 10);
        assert_eq!(filtered.get("00"), 55);
        assert_eq!(filtered.get("11"), 35);
        assert_eq!(filtered.get("01"), 0);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_support_mismatch_detected() {
        let left = counts(&[("00", 50), ("11", 50)]);
        let right = counts(&[("00", 50), ("10", 50)]);
        let err = ContingencyTable::from_counts(&left, &right).unwrap_err();
        match err {
            VerifyError::SupportMismatch {
                left_only,
                right_only,
            } => {
                assert_eq!(left_only, vec!["11"]);
                assert_eq!(right_only, vec!["10"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_identical_rows_have_zero_statistic() {
        let c = counts(&[("00", 50), ("11", 50)]);
        let table = ContingencyTable::from_counts(&c, &c).unwrap();
        let outcome = chi2_contingency(&table);
        assert_eq!(outcome.dof, 1);
        assert!(outcome.statistic.abs() < 1e-12);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn test_similar_rows_pass() {
        let left = counts(&[("00", 52), ("11", 48)]);
        let right = counts(&[("00", 47), ("11", 53)]);
        let table = ContingencyTable::from_counts(&left, &right).unwrap();
        let outcome = chi2_contingency(&table);
        assert!(outcome.p_value > 0.01, "p = {}", outcome.p_value);
    }

    #[test]
    fn test_divergent_rows_fail() {
        let left = counts(&[("00", 95), ("11", 5)]);
        let right = counts(&[("00", 5), ("11", 95)]);
        let table = ContingencyTable::from_counts(&left, &right).unwrap();
        let outcome = chi2_contingency(&table);
        assert!(outcome.p_value < 0.01, "p = {}", outcome.p_value);
    }

    #[test]
    fn test_single_outcome_is_trivially_consistent() {
        let left = counts(&[("0", 100)]);
        let right = counts(&[("0", 100)]);
        let table = ContingencyTable::from_counts(&left, &right).unwrap();
        let outcome = chi2_contingency(&table);
        assert_eq!(outcome.dof, 0);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn test_p_value_reference_points() {
        // chi2 = 3.841 with dof 1 sits at p ≈ 0.05.
        let p = chi_squared_p_value(3.841, 1);
        assert!((p - 0.05).abs() < 0.01, "p = {p}");
        // chi2 = 0 is certain agreement.
        assert_eq!(chi_squared_p_value(0.0, 3), 1.0);
    }
}
