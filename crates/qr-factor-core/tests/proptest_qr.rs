//! Property-based tests for the Gram-Schmidt QR engine.
//!
//! These tests verify that decomposition properties hold across a wide range of inputs:
//! - Q and R always have the documented shapes, including wide inputs
//! - R is always upper triangular
//! - Q has orthonormal columns and Q × R reconstructs A for full-rank inputs
//! - Exactly dependent columns are reported as degenerate without failing
//! - The validator rejects every ragged input
//!
//! Run with: cargo test -p qr-factor-core --test proptest_qr

use proptest::prelude::*;

use qr_factor_core::{dot, norm, qr_decompose, validate_matrix, Matrix, ValidationError};

/// Strategy for arbitrary (possibly rank-deficient, possibly wide) matrices.
fn any_matrix_strategy() -> impl Strategy<Value = Matrix> {
    (1usize..7, 1usize..7).prop_flat_map(|(m, n)| {
        prop::collection::vec(prop::collection::vec(-100.0f64..100.0, n), m).prop_map(Matrix::new)
    })
}

/// Strategy for tall matrices whose leading n×n block is strictly diagonally
/// dominant, which keeps them full column rank and well conditioned.
fn full_rank_strategy() -> impl Strategy<Value = Matrix> {
    (1usize..7)
        .prop_flat_map(|n| (Just(n), n..n + 5))
        .prop_flat_map(|(n, m)| {
            prop::collection::vec(prop::collection::vec(-1.0f64..1.0, n), m).prop_map(move |rows| {
                let mut a = Matrix::new(rows);
                for i in 0..n {
                    let sign = if a[(i, i)] < 0.0 { -1.0 } else { 1.0 };
                    a[(i, i)] += sign * (2.0 * n as f64 + 1.0);
                }
                a
            })
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        max_shrink_iters: 100,
        ..ProptestConfig::default()
    })]

    /// Property: an m×n input yields Q of m×n and R of n×n.
    #[test]
    fn prop_shapes(a in any_matrix_strategy()) {
        let (m, n) = a.shape();
        let qr = qr_decompose(&a);

        prop_assert_eq!(qr.q.shape(), (m, n));
        prop_assert_eq!(qr.r.shape(), (n, n));
    }

    /// Property: R never has entries below the diagonal.
    #[test]
    fn prop_r_upper_triangular(a in any_matrix_strategy()) {
        let qr = qr_decompose(&a);
        prop_assert!(qr.is_upper_triangular());
    }

    /// Property: full-rank inputs give orthonormal Q columns.
    #[test]
    fn prop_orthonormal_columns(a in full_rank_strategy()) {
        let qr = qr_decompose(&a);
        let n = a.cols();

        for j in 0..n {
            let qj = qr.q.column(j);
            let len = norm(&qj);
            prop_assert!((len - 1.0).abs() < 1e-6, "column {} has norm {}", j, len);

            for k in (j + 1)..n {
                let d = dot(&qj, &qr.q.column(k));
                prop_assert!(d.abs() < 1e-6, "columns {} and {} have dot {}", j, k, d);
            }
        }
        prop_assert!(qr.degenerate_columns().is_empty());
    }

    /// Property: Q × R reconstructs A for full-rank inputs.
    #[test]
    fn prop_reconstruction(a in full_rank_strategy()) {
        let qr = qr_decompose(&a);
        let err = qr.reconstruct().max_abs_diff(&a);

        prop_assert!(err < 1e-9, "reconstruction error {}", err);
    }

    /// Property: R has a positive diagonal for full-rank inputs.
    #[test]
    fn prop_positive_diagonal(a in full_rank_strategy()) {
        let qr = qr_decompose(&a);
        for j in 0..a.cols() {
            prop_assert!(qr.r[(j, j)] > 0.0);
        }
    }

    /// Property: two columns along the same axis make the second degenerate.
    #[test]
    fn prop_axis_aligned_dependency(
        m in 1usize..6,
        axis_seed in 0usize..100,
        c in prop_oneof![-50.0f64..-0.5, 0.5f64..50.0],
        d in prop_oneof![-50.0f64..-0.5, 0.5f64..50.0],
    ) {
        let axis = axis_seed % m;
        let mut a = Matrix::zeros(m, 2);
        a[(axis, 0)] = c;
        a[(axis, 1)] = d;

        let qr = qr_decompose(&a);

        prop_assert_eq!(qr.r[(1, 1)], 0.0);
        prop_assert!(qr.q.column(1).iter().all(|&x| x == 0.0));
        prop_assert_eq!(qr.degenerate_columns(), vec![1]);
        prop_assert!(qr.reconstruct().max_abs_diff(&a) < 1e-12);
    }

    /// Property: changing the length of any one row makes the input ragged.
    #[test]
    fn prop_ragged_rejected(
        a in any_matrix_strategy(),
        row_seed in 0usize..100,
        extra in 1usize..3,
    ) {
        prop_assume!(a.rows() > 1);
        let mut rows = a.into_rows();
        let row = 1 + row_seed % (rows.len() - 1);
        rows[row].extend(std::iter::repeat(0.0).take(extra));

        let err = validate_matrix(&rows).unwrap_err();
        prop_assert!(
            matches!(err, ValidationError::NonRectangular { row: r, .. } if r == row),
            "unexpected error {:?}",
            err
        );
    }

    /// Property: the validator accepts every rectangular input.
    #[test]
    fn prop_rectangular_accepted(a in any_matrix_strategy()) {
        prop_assert!(a.validate().is_ok());
    }
}

#[test]
fn scenario_tall_three_by_two() {
    let a = Matrix::from([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    let qr = qr_decompose(&a);

    assert_eq!(qr.q.shape(), (3, 2));
    assert_eq!(qr.r.shape(), (2, 2));
    assert!(qr.is_upper_triangular());
    assert!(qr.orthogonality_error() < 1e-6);
    assert!(qr.reconstruct().max_abs_diff(&a) < 1e-9);
}

#[test]
fn scenario_second_column_doubles_first() {
    let a = Matrix::from([[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]]);
    let qr = qr_decompose(&a);

    assert_eq!(qr.r[(1, 1)], 0.0);
    assert_eq!(qr.q.column(1), vec![0.0; 3]);
}
