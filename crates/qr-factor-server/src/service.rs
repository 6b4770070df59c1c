//! HTTP routes for the QR service.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use qr_factor_core::{compute_stats, qr_decompose, Matrix, MatrixStats, QrFactors};

use crate::auth::{require_bearer, HmacJwtVerifier, TokenVerifier};
use crate::config::ServerConfig;
use crate::error::{ApiError, ConfigError};
use crate::metrics;
use crate::stats_client::StatsClient;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub stats_client: Option<StatsClient>,
}

impl AppState {
    /// Build state from a validated configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let verifier = Arc::new(HmacJwtVerifier::new(config.jwt_secret.as_bytes()));
        let stats_client = config
            .stats_base_url()
            .map(|url| StatsClient::new(url, config.stats_timeout()))
            .transpose()?;

        Ok(Self {
            config: Arc::new(config),
            verifier,
            stats_client,
        })
    }

    /// Replace the token verifier.
    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = verifier;
        self
    }
}

/// Body of `POST /qr`.
#[derive(Debug, Deserialize)]
pub struct QrRequest {
    #[serde(default)]
    pub matrix: Matrix,
}

/// Response of `POST /qr`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QrResponse {
    #[serde(rename = "Q")]
    pub q: Matrix,
    #[serde(rename = "R")]
    pub r: Matrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
}

/// Body of `POST /stats`.
#[derive(Debug, Deserialize)]
pub struct StatsRequestBody {
    #[serde(default)]
    pub matrices: Option<Vec<Matrix>>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;

    Router::new()
        .route("/health", get(health))
        .route("/qr", post(decompose))
        .route("/stats", post(matrix_stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn decompose(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<QrResponse>, ApiError> {
    let request: QrRequest = serde_json::from_slice(&body).map_err(ApiError::InvalidBody)?;
    request.matrix.validate()?;

    let (rows, cols) = request.matrix.shape();
    let start = Instant::now();
    let factors = qr_decompose(&request.matrix);
    let elapsed = start.elapsed();

    if !factors.is_finite() {
        return Err(ApiError::NonFiniteResult);
    }

    let degenerate = factors.degenerate_columns().len();
    metrics::record_decomposition(rows, cols, elapsed, degenerate);
    debug!(
        "Decomposed {}x{} matrix in {:?} ({} degenerate columns)",
        rows, cols, elapsed, degenerate
    );

    let stats = match &state.stats_client {
        Some(client) => enrich(client, headers.get(AUTHORIZATION), &factors).await,
        None => None,
    };

    let QrFactors { q, r } = factors;
    Ok(Json(QrResponse { q, r, stats }))
}

/// Ask the collaborator for stats on Q and R. Failures are logged and
/// swallowed.
async fn enrich(
    client: &StatsClient,
    authorization: Option<&HeaderValue>,
    factors: &QrFactors,
) -> Option<Value> {
    match client
        .fetch_stats(authorization, &[&factors.q, &factors.r])
        .await
    {
        Ok(Value::Null) => {
            metrics::record_enrichment("empty");
            None
        }
        Ok(stats) => {
            metrics::record_enrichment("ok");
            Some(stats)
        }
        Err(e) => {
            warn!("Stats enrichment from {} failed: {}", client.endpoint(), e);
            metrics::record_enrichment(e.category());
            None
        }
    }
}

async fn matrix_stats(body: Bytes) -> Result<Json<MatrixStats>, ApiError> {
    let request: StatsRequestBody =
        serde_json::from_slice(&body).map_err(ApiError::InvalidBody)?;

    let matrices = request
        .matrices
        .filter(|m| !m.is_empty())
        .ok_or(ApiError::MissingMatrices)?;

    let ragged = matrices.iter().filter(|m| !m.is_empty()).any(|m| {
        let cols = m.cols();
        m.as_rows().iter().any(|row| row.len() != cols)
    });
    if ragged {
        return Err(ApiError::RaggedMatrices);
    }

    let stats = compute_stats(&matrices);
    if !stats.is_finite() {
        return Err(ApiError::NonFiniteStats);
    }
    Ok(Json(stats))
}
