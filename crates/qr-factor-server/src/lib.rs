//! QR Factorization HTTP Service
//!
//! JSON service exposing classical Gram-Schmidt QR decomposition, guarded
//! by HMAC-signed bearer tokens.
//!
//! ## Features
//!
//! - `POST /qr`: decompose `{"matrix": [[...]]}` into `{"Q", "R"}`
//! - Optional best-effort enrichment from a stats collaborator
//! - `POST /stats`: summary statistics over a list of matrices
//! - `GET /health`: unauthenticated liveness check
//! - Prometheus metrics
//!
//! ## Usage
//!
//! ```bash
//! # Start the server
//! JWT_SECRET=devsecret qr-factor-server --port 8080
//!
//! # With stats enrichment
//! qr-factor-server --jwt-secret devsecret --stats-api-url http://localhost:3000
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod stats_client;

pub use auth::{HmacJwtVerifier, TokenVerifier};
pub use config::ServerConfig;
pub use error::{ApiError, AuthError, ConfigError, StatsClientError};
pub use service::{router, AppState, QrRequest, QrResponse};
pub use stats_client::StatsClient;
