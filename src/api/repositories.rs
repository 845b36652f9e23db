//! Ranking API endpoints.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{RepoRecord, SortField};
use crate::AppState;

/// Query parameters for the ranking endpoint.
#[derive(Debug, Deserialize)]
pub struct TopRepositoriesQuery {
    #[serde(default)]
    pub sort_by: Option<String>,
}

/// GET /api/repos/top100 - The current ranking snapshot.
pub async fn get_top_repositories(
    State(state): State<AppState>,
    Query(query): Query<TopRepositoriesQuery>,
) -> ApiResult<Vec<RepoRecord>> {
    let sort = match query.sort_by.as_deref() {
        None => SortField::default(),
        Some(raw) => SortField::from_str(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown sort field: {}", raw)))?,
    };

    tracing::info!("Fetching top repositories sorted by {}", sort.as_column());
    let repos = state.repo.list_top(sort).await?;
    success(repos)
}
