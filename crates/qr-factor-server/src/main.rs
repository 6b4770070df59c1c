//! QR Factorization Server
//!
//! ## Usage
//!
//! ```bash
//! # Start with default settings (port 8080)
//! JWT_SECRET=devsecret qr-factor-server
//!
//! # Custom port
//! qr-factor-server --jwt-secret devsecret --port 3001
//!
//! # With stats enrichment and metrics
//! qr-factor-server --stats-api-url http://localhost:3000 --metrics true --metrics-port 9090
//!
//! # From a JSON config file (flags override file values)
//! qr-factor-server --config server.json
//! ```

use std::net::SocketAddr;
use std::path::Path;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use qr_factor_server::{router, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "qr-factor-server")]
#[command(version)]
#[command(about = "QR Factorization HTTP Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Shared secret for bearer token verification
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Base URL of the stats collaborator
    #[arg(long, env = "STATS_API_URL")]
    stats_api_url: Option<String>,

    /// Stats collaborator timeout in milliseconds
    #[arg(long)]
    stats_timeout_ms: Option<u64>,

    /// Maximum request body size in KB
    #[arg(long)]
    max_body_size_kb: Option<usize>,

    /// Enable Prometheus metrics
    #[arg(long)]
    metrics: Option<bool>,

    /// Metrics port
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<String>,
}

impl Args {
    /// Layer command-line values over the file (or default) configuration.
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(Path::new(path))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(secret) = self.jwt_secret {
            config.jwt_secret = secret;
        }
        if let Some(url) = self.stats_api_url {
            config.stats_api_url = Some(url);
        }
        if let Some(timeout) = self.stats_timeout_ms {
            config.stats_timeout_ms = timeout;
        }
        if let Some(kb) = self.max_body_size_kb {
            config.max_body_size = kb * 1024;
        }
        if let Some(enabled) = self.metrics {
            config.metrics_enabled = enabled;
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    // Initialize logging
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize metrics if enabled
    if config.metrics_enabled {
        let metrics_addr: SocketAddr = format!("0.0.0.0:{}", config.metrics_port).parse()?;
        info!("Starting Prometheus metrics server on {}", metrics_addr);

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
    }

    let addr = config.bind_addr()?;
    let state = AppState::new(config)?;

    info!("Starting QR factorization server...");
    info!("  Address:          {}", addr);
    info!("  Max body size:    {} KB", state.config.max_body_size / 1024);
    info!("  Public paths:     {}", state.config.public_paths.join(", "));
    info!(
        "  Stats enrichment: {}",
        match &state.stats_client {
            Some(client) => format!(
                "{} (timeout {} ms)",
                client.endpoint(),
                client.timeout().as_millis()
            ),
            None => "disabled".to_string(),
        }
    );
    info!(
        "  Metrics:          {}",
        if state.config.metrics_enabled {
            format!("port {}", state.config.metrics_port)
        } else {
            "disabled".to_string()
        }
    );

    let listener = TcpListener::bind(addr).await?;
    info!("Ready to accept connections!");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
