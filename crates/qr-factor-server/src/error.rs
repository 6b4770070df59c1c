//! Error types for the QR service.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use qr_factor_core::ValidationError;

/// Bearer authentication failures. All map to `401 Unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header, or an empty one.
    #[error("missing Authorization header")]
    MissingHeader,

    /// Header present but not `Bearer <token>`.
    #[error("invalid Authorization format")]
    InvalidFormat,

    /// Token failed signature or claim verification.
    #[error("invalid token")]
    InvalidToken,
}

/// Errors talking to the stats collaborator.
///
/// These never reach the client; the enrichment step logs them and drops the
/// `stats` field.
#[derive(Debug, Error)]
pub enum StatsClientError {
    /// Request exceeded the configured timeout.
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Could not connect or the connection broke mid-request.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Collaborator answered with a non-2xx status.
    #[error("HTTP error: {status}")]
    Status { status: u16 },

    /// Body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Base URL could not be parsed or has an unsupported scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be built.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

impl StatsClientError {
    /// Classify a reqwest error, reporting timeouts against `timeout`.
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            StatsClientError::Timeout(timeout.as_millis() as u64)
        } else if e.is_decode() {
            StatsClientError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            StatsClientError::Status {
                status: status.as_u16(),
            }
        } else {
            StatsClientError::Connection(e.to_string())
        }
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            StatsClientError::Timeout(_) => "timeout",
            StatsClientError::Connection(_) => "connection",
            StatsClientError::Status { .. } => "status",
            StatsClientError::Decode(_) => "decode",
            StatsClientError::InvalidUrl(_) => "invalid_url",
            StatsClientError::Configuration(_) => "configuration",
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("JWT secret must be set (--jwt-secret or JWT_SECRET)")]
    MissingSecret,

    #[error("invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("stats collaborator: {0}")]
    StatsClient(#[from] StatsClientError),
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid JSON body")]
    InvalidBody(#[source] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("matrix values out of range")]
    NonFiniteResult,

    #[error("matrices array is required")]
    MissingMatrices,

    #[error("all matrices must be rectangular")]
    RaggedMatrices,

    #[error("no numeric values found")]
    NonFiniteStats,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Auth(AuthError::MissingHeader) => "auth_missing",
            ApiError::Auth(AuthError::InvalidFormat) => "auth_format",
            ApiError::Auth(AuthError::InvalidToken) => "auth_token",
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::Validation(e) => e.category(),
            ApiError::NonFiniteResult => "non_finite_result",
            ApiError::MissingMatrices => "missing_matrices",
            ApiError::RaggedMatrices => "ragged_matrices",
            ApiError::NonFiniteStats => "non_finite_stats",
        }
    }
}

/// JSON error body: `{"error": "<reason>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        crate::metrics::record_error(self.category());

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
