//! Summary statistics over a collection of matrices.

use serde::{Deserialize, Serialize};

use crate::types::Matrix;

/// Aggregate statistics over every entry of a list of matrices.
///
/// With no entries at all, `min` is `+∞` and `max` is `-∞`; both serialize
/// to JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixStats {
    pub max: f64,
    pub min: f64,
    pub sum: f64,
    pub average: f64,
    /// Whether any square input matrix is diagonal.
    pub any_diagonal: bool,
}

impl Default for MatrixStats {
    fn default() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            sum: 0.0,
            average: 0.0,
            any_diagonal: false,
        }
    }
}

impl MatrixStats {
    /// Whether the sum is finite (it overflows for very large inputs).
    pub fn is_finite(&self) -> bool {
        self.sum.is_finite()
    }
}

/// Compute [`MatrixStats`] over `matrices`.
///
/// Matrices with no rows are skipped. Each row contributes as many values as
/// the first row of its matrix declares; shape checking is the caller's job.
pub fn compute_stats(matrices: &[Matrix]) -> MatrixStats {
    let mut stats = MatrixStats::default();
    let mut count = 0usize;

    for m in matrices.iter().filter(|m| !m.is_empty()) {
        let cols = m.cols();
        for row in m.as_rows() {
            for &v in row.iter().take(cols) {
                stats.min = stats.min.min(v);
                stats.max = stats.max.max(v);
                stats.sum += v;
                count += 1;
            }
        }

        if !stats.any_diagonal && is_diagonal(m) {
            stats.any_diagonal = true;
        }
    }

    if count > 0 {
        stats.average = stats.sum / count as f64;
    }
    stats
}

/// Whether `m` is square with every off-diagonal entry exactly zero.
pub fn is_diagonal(m: &Matrix) -> bool {
    if m.is_empty() || !m.is_square() {
        return false;
    }
    m.as_rows().iter().enumerate().all(|(i, row)| {
        row.iter()
            .enumerate()
            .all(|(j, &v)| i == j || v == 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_matrices() {
        let input = vec![
            Matrix::from([[1.0, 0.0], [0.0, 2.0]]),
            Matrix::from([[3.0, 4.0], [5.0, 6.0]]),
        ];

        let stats = compute_stats(&input);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 6.0);
        assert_eq!(stats.sum, 21.0);
        assert_eq!(stats.average, 21.0 / 8.0);
        assert!(stats.any_diagonal);
    }

    #[test]
    fn test_empty_matrices_skipped() {
        let input = vec![Matrix::default(), Matrix::from([[-1.0, 5.0]])];

        let stats = compute_stats(&input);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.average, 2.0);
        assert!(!stats.any_diagonal);
    }

    #[test]
    fn test_no_values() {
        let stats = compute_stats(&[Matrix::default()]);
        assert_eq!(stats, MatrixStats::default());
        assert!(stats.is_finite());

        let json = serde_json::to_value(stats).unwrap();
        assert!(json["min"].is_null());
        assert_eq!(json["anyDiagonal"], false);
    }

    #[test]
    fn test_overflowing_sum() {
        let stats = compute_stats(&[Matrix::from([[f64::MAX, f64::MAX]])]);
        assert!(!stats.is_finite());
    }

    #[test]
    fn test_is_diagonal() {
        assert!(is_diagonal(&Matrix::identity(3)));
        assert!(is_diagonal(&Matrix::zeros(2, 2)));
        assert!(!is_diagonal(&Matrix::from([[1.0, 0.0, 0.0]])));
        assert!(!is_diagonal(&Matrix::from([[1.0, 1e-300], [0.0, 1.0]])));
    }
}
