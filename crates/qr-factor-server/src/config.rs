//! Server configuration.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Server configuration.
///
/// Built once at startup and shared read-only with every request handler.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared HMAC secret for bearer token verification
    #[serde(default)]
    pub jwt_secret: String,

    /// Base URL of the stats collaborator; enrichment is off when unset
    #[serde(default)]
    pub stats_api_url: Option<String>,

    /// Timeout for the stats collaborator call (milliseconds)
    #[serde(default = "default_stats_timeout_ms")]
    pub stats_timeout_ms: u64,

    /// Paths reachable without a bearer token
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Maximum request body size (bytes)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Enable Prometheus metrics
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,

    /// Metrics port
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("stats_api_url", &self.stats_api_url)
            .field("stats_timeout_ms", &self.stats_timeout_ms)
            .field("public_paths", &self.public_paths)
            .field("max_body_size", &self.max_body_size)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("metrics_port", &self.metrics_port)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: String::new(),
            stats_api_url: None,
            stats_timeout_ms: default_stats_timeout_ms(),
            public_paths: default_public_paths(),
            max_body_size: default_max_body_size(),
            metrics_enabled: default_metrics_enabled(),
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Set the token signing secret.
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Set the stats collaborator base URL.
    pub fn with_stats_api_url(mut self, url: impl Into<String>) -> Self {
        self.stats_api_url = Some(url.into());
        self
    }

    /// Set the stats collaborator timeout.
    pub fn with_stats_timeout(mut self, timeout: Duration) -> Self {
        self.stats_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Stats collaborator timeout as a `Duration`.
    pub fn stats_timeout(&self) -> Duration {
        Duration::from_millis(self.stats_timeout_ms)
    }

    /// Stats collaborator base URL, treating a blank value as unset.
    pub fn stats_base_url(&self) -> Option<&str> {
        self.stats_api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether `path` skips bearer authentication.
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }

    /// Check values that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.stats_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stats_timeout_ms",
                message: "must be greater than zero".into(),
            });
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_body_size",
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_stats_timeout_ms() -> u64 {
    5_000
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_string()]
}

fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

fn default_metrics_enabled() -> bool {
    false
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}
