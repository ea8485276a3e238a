use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// Every field can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATA_DIR | /var/lib/nursery | Data directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout (ms) |
/// | JWT_SECRET | (generated in dev) | Token signing secret |
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory holding the database and log files
    pub data_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT validation configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load the configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/nursery".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Override data directory and port, commonly used in tests
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Directory for the embedded database files
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("database")
    }

    /// Make sure the data directory layout exists
    pub fn ensure_data_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
