//! QR decomposition by classical Gram-Schmidt orthogonalization.
//!
//! For an m×n input `A` this produces `Q` (m×n) and `R` (n×n, upper
//! triangular) with `A = Q × R` whenever no column of `A` is linearly
//! dependent on the columns before it.
//!
//! ## Algorithm
//!
//! For each column `j`:
//!
//! 1. `v ← A[:, j]`
//! 2. for every earlier column `k < j`: `R[k][j] = ⟨Q[:, k], v⟩`,
//!    `v ← v − R[k][j] · Q[:, k]`
//! 3. `R[j][j] = ‖v‖`
//! 4. if `R[j][j] == 0` the column is degenerate: `Q[:, j]` stays zero
//! 5. otherwise `Q[:, j] = v / R[j][j]`
//!
//! This is the textbook formulation with a single orthogonalization pass.
//! It is accurate for small, well-conditioned inputs and loses
//! orthogonality as the condition number grows; there is no
//! re-orthogonalization and no pivoting.
//!
//! ## Wide matrices
//!
//! Inputs with more columns than rows are not rejected. Once `m`
//! independent columns have been processed they span the whole space, so
//! later residuals are zero up to rounding. An exactly-zero residual is
//! treated as degenerate; a rounding-sized residual is normalized like any
//! other column, which yields a unit column that is not orthogonal to the
//! rest. Shapes are always m×n and n×n.

use crate::error::Result;
use crate::types::{dot, norm, sub_scaled, Matrix};
use crate::validate::validate_matrix;

/// Result of a QR decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct QrFactors {
    /// m×n factor with orthonormal (or zero) columns.
    pub q: Matrix,
    /// n×n upper-triangular factor.
    pub r: Matrix,
}

impl QrFactors {
    /// Validate `rows` and decompose it.
    pub fn compute(rows: &[Vec<f64>]) -> Result<Self> {
        validate_matrix(rows)?;
        Ok(qr_decompose(&Matrix::new(rows.to_vec())))
    }

    /// Compute `Q × R`.
    pub fn reconstruct(&self) -> Matrix {
        self.q.matmul(&self.r)
    }

    /// Whether every entry of `R` below the diagonal is exactly zero.
    pub fn is_upper_triangular(&self) -> bool {
        let n = self.r.rows();
        (0..n).all(|i| (0..i).all(|j| self.r[(i, j)] == 0.0))
    }

    /// Whether every entry of `Q` and `R` is finite.
    ///
    /// Finite input can still overflow when a column norm exceeds
    /// `f64::MAX`.
    pub fn is_finite(&self) -> bool {
        self.q.is_finite() && self.r.is_finite()
    }

    /// Indices of columns that were linearly dependent (`R[j][j] == 0`).
    pub fn degenerate_columns(&self) -> Vec<usize> {
        (0..self.r.rows())
            .filter(|&j| self.r[(j, j)] == 0.0)
            .collect()
    }

    /// Largest deviation of `QᵀQ` from the identity, restricted to
    /// non-degenerate columns.
    pub fn orthogonality_error(&self) -> f64 {
        let live: Vec<Vec<f64>> = (0..self.q.cols())
            .filter(|&j| self.r[(j, j)] != 0.0)
            .map(|j| self.q.column(j))
            .collect();

        let mut worst = 0.0f64;
        for (a, qa) in live.iter().enumerate() {
            for (b, qb) in live.iter().enumerate().skip(a) {
                let expected = if a == b { 1.0 } else { 0.0 };
                worst = worst.max((dot(qa, qb) - expected).abs());
            }
        }
        worst
    }
}

/// Decompose a validated matrix into `Q` and `R`.
///
/// Never fails. Degenerate columns show up as zero columns of `Q` with a
/// zero diagonal entry in `R`.
///
/// # Panics
///
/// Panics if `a` is ragged. Run [`validate_matrix`] (or use
/// [`QrFactors::compute`]) on untrusted input first.
pub fn qr_decompose(a: &Matrix) -> QrFactors {
    let (m, n) = a.shape();

    let mut q = Matrix::zeros(m, n);
    let mut r = Matrix::zeros(n, n);

    // Finished Q columns, kept contiguous for the projection loop.
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(n);

    for j in 0..n {
        let mut v = a.column(j);

        for (k, q_k) in basis.iter().enumerate() {
            let proj = dot(q_k, &v);
            r[(k, j)] = proj;
            sub_scaled(&mut v, q_k, proj);
        }

        let r_jj = norm(&v);
        r[(j, j)] = r_jj;

        if r_jj == 0.0 {
            basis.push(vec![0.0; m]);
            continue;
        }

        for x in v.iter_mut() {
            *x /= r_jj;
        }
        q.set_column(j, &v);
        basis.push(v);
    }

    QrFactors { q, r }
}
