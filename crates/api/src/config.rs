//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the Trainerbook
//! API server. Values come from environment variables, with defaults where
//! appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3001)
//! - `STORAGE`: `postgres` (default) or `memory`
//! - `DATABASE_URL`: PostgreSQL connection string (required for `postgres`)
//! - `SERVICE_TOKEN`: Shared bearer token required on every appointment route
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request deadline (default: 30)
//! - `SEED_FILE`: Optional JSON file loaded into an empty appointment store

use eyre::{Result, WrapErr, eyre};
use std::{env, path::PathBuf, str::FromStr};
use tracing::Level;

/// Where appointments are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = eyre::Report;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(eyre!("Unknown STORAGE value: {}", other)),
        }
    }
}

/// Configuration for the Trainerbook API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Appointment storage backend
    pub storage: StorageBackend,

    /// PostgreSQL database connection string
    pub database_url: Option<String>,

    /// Bearer token every client must present
    pub service_token: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Seed file loaded into an empty store at startup
    pub seed_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `SERVICE_TOKEN` is not set or empty
    /// - `DATABASE_URL` is not set while the storage backend is `postgres`
    /// - `API_PORT` cannot be parsed as a u16
    /// - `STORAGE` names an unknown backend
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Storage settings
        let storage = match lookup("STORAGE") {
            Some(value) => value.parse()?,
            None => StorageBackend::Postgres,
        };
        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(eyre!("DATABASE_URL environment variable must be set"));
        }

        // Security settings
        let service_token = lookup("SERVICE_TOKEN")
            .filter(|token| !token.is_empty())
            .ok_or_else(|| eyre!("SERVICE_TOKEN environment variable must be set"))?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        let seed_file = lookup("SEED_FILE").map(PathBuf::from);

        Ok(Self {
            host,
            port,
            storage,
            database_url,
            service_token,
            log_level,
            cors_origins,
            request_timeout,
            seed_file,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
