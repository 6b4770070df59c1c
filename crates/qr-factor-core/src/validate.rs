//! Structural validation applied before decomposition.

use crate::error::{Result, ValidationError};

/// Check that `rows` describes a non-empty rectangular matrix.
///
/// Checks run in order and the first failure is returned:
/// no rows, an empty first row, then any row whose length differs from the
/// first.
pub fn validate_matrix(rows: &[Vec<f64>]) -> Result<()> {
    let first = rows.first().ok_or(ValidationError::EmptyMatrix)?;

    let cols = first.len();
    if cols == 0 {
        return Err(ValidationError::EmptyColumns);
    }

    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(ValidationError::non_rectangular(row, cols, r.len()));
    }

    Ok(())
}
