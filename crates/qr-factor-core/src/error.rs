//! Error types for matrix validation.

use thiserror::Error;

/// Result type alias for validation operations.
pub type Result<T> = core::result::Result<T, ValidationError>;

/// Structural problems that prevent a matrix from being decomposed.
///
/// The `Display` text is the client-facing reason and is stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The matrix has no rows.
    #[error("matrix must not be empty")]
    EmptyMatrix,

    /// The first row has no elements.
    #[error("matrix must have at least one column")]
    EmptyColumns,

    /// A row's length differs from the first row's.
    #[error("matrix must be rectangular")]
    NonRectangular {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
}

impl ValidationError {
    /// Create a non-rectangular error for `row`.
    pub fn non_rectangular(row: usize, expected: usize, actual: usize) -> Self {
        ValidationError::NonRectangular {
            row,
            expected,
            actual,
        }
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            ValidationError::EmptyMatrix => "empty_matrix",
            ValidationError::EmptyColumns => "empty_columns",
            ValidationError::NonRectangular { .. } => "non_rectangular",
        }
    }
}
