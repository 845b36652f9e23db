//! Server binary: REST API plus the in-process ingestion scheduler.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use top100_backend::config::Config;
use top100_backend::db::{self, Repository};
use top100_backend::github::GithubClient;
use top100_backend::ingest::{self, Ingester};
use top100_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting top100 backend");
    tracing::info!("Upstream API: {}", config.github_base_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.github_token.is_none() {
        tracing::warn!(
            "No API token configured (TOP100_GITHUB_TOKEN). Unauthenticated rate limits apply."
        );
    }

    // Initialize database
    let pool = db::init_database(&config.database_url).await?;
    let repo = Arc::new(Repository::new(pool));

    // Start the in-process ingestion scheduler
    if config.ingest_interval.is_zero() {
        tracing::info!("In-process ingestion disabled (TOP100_INGEST_INTERVAL_SECS=0)");
    } else {
        let source = Arc::new(GithubClient::new(
            &config.github_base_url,
            config.github_token.as_deref(),
        )?);
        let ingester = Ingester::new(Arc::clone(&repo), source, &config);
        tracing::info!(
            "Scheduling ingestion every {} second(s)",
            config.ingest_interval.as_secs()
        );
        tokio::spawn(ingest::run_scheduler(ingester, config.ingest_interval));
    }

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
