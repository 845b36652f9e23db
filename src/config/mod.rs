//! Configuration module for the tracker backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Base URL of the GitHub-compatible API
    pub github_base_url: String,
    /// Optional bearer token for the upstream API
    pub github_token: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// How many repositories the ranking tracks
    pub ranking_limit: u32,
    /// Period between in-process ingestion runs (zero disables the scheduler)
    pub ingest_interval: Duration,
    /// Pause between per-repository activity fetches
    pub fetch_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("TOP100_DATABASE_URL").unwrap_or_else(|_| database_url_from_parts());

        let github_base_url = env::var("TOP100_GITHUB_BASE_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());

        let github_token = env::var("TOP100_GITHUB_TOKEN").ok();

        let bind_addr = env::var("TOP100_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid TOP100_BIND_ADDR format");

        let log_level = env::var("TOP100_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let ranking_limit = env::var("TOP100_RANKING_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let ingest_interval = env::var("TOP100_INGEST_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(3600));

        let fetch_delay = env::var("TOP100_FETCH_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1000));

        Self {
            database_url,
            github_base_url,
            github_token,
            bind_addr,
            log_level,
            ranking_limit,
            ingest_interval,
            fetch_delay,
        }
    }
}

/// Compose the connection URL from the discrete POSTGRES_* variables that the
/// deployment exposes to every container.
fn database_url_from_parts() -> String {
    let user = env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string());
    let password = env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db = env::var("POSTGRES_DB").unwrap_or_else(|_| "top100".to_string());
    format!("postgresql://{user}:{password}@{host}:{port}/{db}")
}
