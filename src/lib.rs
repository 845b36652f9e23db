//! Top 100 Repositories Tracker Backend
//!
//! Keeps a PostgreSQL snapshot of the top repositories of a GitHub-compatible
//! platform ranked by stars, together with per-day commit and author activity,
//! and serves both over a small REST API. The data is refreshed by a periodic
//! ingester that can run in-process or as a standalone one-shot binary.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod github;
pub mod ingest;
pub mod models;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        .route("/repos/top100", get(api::get_top_repositories))
        .route(
            "/repos/{owner}/{repo}/activity",
            get(api::get_repository_activity),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
