//! Application configuration loaded from environment variables.

/// Which adapter backs the workload store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Volatile, single-process store. The default for local runs.
    #[default]
    Memory,
    /// Row-per-month relational store; requires `DATABASE_URL`.
    Postgres,
    /// Document-per-trainer store; requires `MONGO_URL`.
    Mongo,
}

impl StorageBackend {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" => StorageBackend::Postgres,
            "mongo" | "mongodb" => StorageBackend::Mongo,
            _ => StorageBackend::Memory,
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `STORAGE_BACKEND` — `memory`, `postgres`, or `mongo` (default: `memory`)
/// - `DATABASE_URL` — Postgres connection string
/// - `MONGO_URL` — MongoDB connection string
/// - `MONGO_DATABASE` — MongoDB database name (default: `"workload"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub mongo_url: Option<String>,
    pub mongo_database: String,
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
            backend: std::env::var("STORAGE_BACKEND")
                .map(|v| StorageBackend::parse(&v))
                .unwrap_or_default(),
            database_url: std::env::var("DATABASE_URL").ok(),
            mongo_url: std::env::var("MONGO_URL").ok(),
            mongo_database: std::env::var("MONGO_DATABASE")
                .unwrap_or_else(|_| "workload".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            backend: StorageBackend::Memory,
            database_url: None,
            mongo_url: None,
            mongo_database: "workload".to_string(),
        }
    }
}
