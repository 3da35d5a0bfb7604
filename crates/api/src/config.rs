//! Application configuration loaded from environment variables.
//!
//! The environment is read here, at the edge, and nowhere else; everything
//! downstream receives explicit config structs.

use std::time::Duration;

use collaborators::CollaboratorConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — Postgres ledger DSN; unset means in-memory ledger
/// - `CART_SERVICE_URL`, `PRODUCT_SERVICE_URL`, `INVENTORY_SERVICE_URL`
/// - `COLLABORATOR_TIMEOUT_MS` — per-call collaborator timeout (default 5000)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub cart_service_url: String,
    pub product_service_url: String,
    pub inventory_service_url: String,
    pub collaborator_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            cart_service_url: std::env::var("CART_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            product_service_url: std::env::var("PRODUCT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            inventory_service_url: std::env::var("INVENTORY_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8003".to_string()),
            collaborator_timeout: Duration::from_millis(
                std::env::var("COLLABORATOR_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5000),
            ),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the collaborator client config from this server config.
    pub fn collaborators(&self) -> CollaboratorConfig {
        CollaboratorConfig::new(
            self.cart_service_url.clone(),
            self.product_service_url.clone(),
            self.inventory_service_url.clone(),
        )
        .with_timeout(self.collaborator_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            cart_service_url: "http://localhost:8001".to_string(),
            product_service_url: "http://localhost:8002".to_string(),
            inventory_service_url: "http://localhost:8003".to_string(),
            collaborator_timeout: Duration::from_millis(5000),
        }
    }
}
