//! Activity API endpoints.

use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::ActivityRecord;
use crate::AppState;

/// Query parameters for the activity endpoint. Both bounds are inclusive.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default)]
    pub since: Option<NaiveDate>,
    #[serde(default)]
    pub until: Option<NaiveDate>,
}

/// GET /api/repos/{owner}/{repo}/activity - Daily commit activity.
///
/// Returns an empty list for repositories with no recorded activity.
pub async fn get_repository_activity(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Vec<ActivityRecord>> {
    tracing::info!(
        "Fetching activity for {}/{} from {:?} to {:?}",
        owner,
        repo,
        query.since,
        query.until
    );

    let rows = state
        .repo
        .get_activity(&repo, &owner, query.since, query.until)
        .await?;
    success(rows)
}
