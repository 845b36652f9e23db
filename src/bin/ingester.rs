//! One-shot ingestion binary for cron-driven deployments.
//!
//! Runs a single ingestion pass and exits; non-zero on failure so the
//! scheduler can alert on it.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use top100_backend::config::Config;
use top100_backend::db::{self, Repository};
use top100_backend::github::GithubClient;
use top100_backend::ingest::Ingester;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting one-shot ingestion run");

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Ingestion run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = db::init_database(&config.database_url).await?;
    let repo = Arc::new(Repository::new(pool));

    let source = Arc::new(GithubClient::new(
        &config.github_base_url,
        config.github_token.as_deref(),
    )?);

    let ingester = Ingester::new(repo, source, config);
    let summary = ingester.run_once().await?;

    tracing::info!(
        "Ingestion finished: {} repositories, {} activity failure(s)",
        summary.repositories,
        summary.failed
    );
    Ok(())
}
