//! # QR Factor Core
//!
//! QR decomposition of dense real matrices by classical Gram-Schmidt, plus
//! the structural validation that must pass before a matrix reaches the
//! decomposition engine.
//!
//! This crate performs no I/O and holds no state between calls. Every
//! function is a pure function of its input, so callers may run it from any
//! number of threads without coordination.
//!
//! ## Modules
//!
//! - [`validate`] - non-empty and rectangular checks
//! - [`gram_schmidt`] - the decomposition engine
//! - [`stats`] - summary statistics over a list of matrices
//!
//! ## Example
//!
//! ```
//! use qr_factor_core::{qr_decompose, Matrix};
//!
//! let a = Matrix::from([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
//! a.validate()?;
//!
//! let qr = qr_decompose(&a);
//! assert_eq!(qr.q.shape(), (3, 2));
//! assert_eq!(qr.r.shape(), (2, 2));
//! assert!(qr.reconstruct().max_abs_diff(&a) < 1e-9);
//! # Ok::<(), qr_factor_core::ValidationError>(())
//! ```

pub mod error;
pub mod gram_schmidt;
pub mod stats;
pub mod types;
pub mod validate;

pub use error::{Result, ValidationError};
pub use gram_schmidt::{qr_decompose, QrFactors};
pub use stats::{compute_stats, MatrixStats};
pub use types::{dot, norm, Matrix};
pub use validate::validate_matrix;
