//! Upstream repository information sources.
//!
//! The ingester talks to the upstream platform through the [`RepoInfoSource`]
//! trait; the production implementation is a GitHub REST client.

mod client;

pub use client::*;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Repository metadata as reported by the upstream ranking search.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    pub name: String,
    pub owner: String,
    pub stars: i32,
    pub watchers: i32,
    pub forks: i32,
    pub open_issues: i32,
    pub language: Option<String>,
}

/// Commit activity of one repository on one calendar day, as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub commits: i32,
    pub authors: Vec<String>,
}

/// Source of repository rankings and commit activity.
#[async_trait]
pub trait RepoInfoSource: Send + Sync {
    /// Fetch the top repositories by star count.
    async fn top_repositories(&self, limit: u32) -> Result<Vec<RepoInfo>, GithubError>;

    /// Fetch commit activity for a repository within a time range, grouped
    /// by calendar day.
    async fn repository_activity(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyActivity>, GithubError>;
}
