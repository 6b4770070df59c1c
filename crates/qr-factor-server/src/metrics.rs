//! Prometheus metrics for the QR service.

use std::time::Duration;

use metrics::{counter, histogram};

/// Record a completed decomposition
pub fn record_decomposition(rows: usize, cols: usize, elapsed: Duration, degenerate: usize) {
    counter!("qr_factor_decompositions_total").increment(1);
    histogram!("qr_factor_decomposition_duration_seconds").record(elapsed.as_secs_f64());
    histogram!("qr_factor_matrix_elements").record((rows * cols) as f64);

    if degenerate > 0 {
        counter!("qr_factor_degenerate_columns_total").increment(degenerate as u64);
    }
}

/// Record the outcome of a stats enrichment attempt
pub fn record_enrichment(outcome: &'static str) {
    counter!("qr_factor_enrichment_total", "outcome" => outcome).increment(1);
}

/// Record an error returned to a client
pub fn record_error(kind: &'static str) {
    counter!("qr_factor_errors_total", "kind" => kind).increment(1);
}
