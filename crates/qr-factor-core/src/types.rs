//! Dense row-major matrix and column vector helpers.

use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validate::validate_matrix;

/// A real-valued matrix stored as a sequence of rows.
///
/// Serializes transparently as a JSON array of arrays. Deserialization does
/// not check shape; call [`Matrix::validate`] before relying on
/// rectangularity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix(Vec<Vec<f64>>);

impl Matrix {
    /// Wrap a list of rows.
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Matrix(rows)
    }

    /// Create a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix(vec![vec![0.0; cols]; rows])
    }

    /// Create the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.0.len()
    }

    /// Number of columns, taken from the first row.
    pub fn cols(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Check structural preconditions (non-empty, rectangular).
    pub fn validate(&self) -> Result<()> {
        validate_matrix(&self.0)
    }

    /// Borrow the rows.
    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    /// Consume into the underlying rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.0
    }

    /// Iterate over every entry in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }

    /// Copy column `j` out as a vector.
    ///
    /// # Panics
    ///
    /// Panics if any row is shorter than `j + 1`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.0.iter().map(|row| row[j]).collect()
    }

    /// Overwrite column `j` with `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != self.rows()` or `j` is out of bounds.
    pub fn set_column(&mut self, j: usize, values: &[f64]) {
        assert_eq!(values.len(), self.rows(), "column length mismatch");
        for (row, &v) in self.0.iter_mut().zip(values) {
            row[j] = v;
        }
    }

    /// Whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.values().all(f64::is_finite)
    }

    /// Matrix product `self × other`.
    ///
    /// # Panics
    ///
    /// Panics if `self.cols() != other.rows()`.
    pub fn matmul(&self, other: &Matrix) -> Matrix {
        let (m, k) = self.shape();
        assert_eq!(k, other.rows(), "inner dimensions must agree");
        let n = other.cols();

        let mut out = Matrix::zeros(m, n);
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0;
                for p in 0..k {
                    sum += self[(i, p)] * other[(p, j)];
                }
                out[(i, j)] = sum;
            }
        }
        out
    }

    /// Largest absolute element-wise difference to `other`.
    ///
    /// Returns `f64::INFINITY` when the shapes differ.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        if self.shape() != other.shape() {
            return f64::INFINITY;
        }
        self.values()
            .zip(other.values())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.0[i][j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.0[i][j]
    }
}

impl From<Vec<Vec<f64>>> for Matrix {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Matrix(rows)
    }
}

impl<const R: usize, const C: usize> From<[[f64; C]; R]> for Matrix {
    fn from(rows: [[f64; C]; R]) -> Self {
        Matrix(rows.iter().map(|r| r.to_vec()).collect())
    }
}

/// Dot product of two equal-length vectors.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `y -= alpha * x`, element-wise.
#[inline]
pub(crate) fn sub_scaled(y: &mut [f64], x: &[f64], alpha: f64) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi -= alpha * xi;
    }
}
