//! Configuration management for the budgeting core.

/// Database configuration and connection management
pub mod database;

/// Initial budget structure loading from seed.toml
pub mod seed;

use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Default sqlite database location when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/budgetbook.sqlite";

/// Application configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string
    pub database_url: String,
    /// Optional path to a seed.toml applied on startup
    pub seed_path: Option<String>,
}

/// Loads the application configuration from the environment.
///
/// A `.env` file is read first when present (non-fatal when missing, so
/// variables can also be set externally). `DATABASE_URL` falls back to a
/// local sqlite file; `SEED_PATH` is optional.
pub fn load_app_configuration() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let seed_path = std::env::var("SEED_PATH").ok();

    if database_url.trim().is_empty() {
        return Err(Error::Config {
            message: "DATABASE_URL is set but empty".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        seed_path,
    })
}

/// Initializes tracing with an env-filter, defaulting to `info`.
///
/// Opt-in for embedding binaries; calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
