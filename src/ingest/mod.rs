//! Periodic ranking and activity ingestion.
//!
//! Each run refreshes the `top100` snapshot in one transaction, then walks
//! the fetched repositories and upserts their per-day commit activity. A
//! failure on a single repository is isolated; the run only fails if the
//! ranking refresh itself fails.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;
use crate::github::{DailyActivity, RepoInfo, RepoInfoSource};
use crate::models::{ActivityRecord, RepoRecord};

/// How far back to fetch activity for a repository with no recorded history.
const BACKFILL_DAYS: u64 = 30;

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Repositories in the refreshed ranking.
    pub repositories: usize,
    /// Repositories whose activity update failed.
    pub failed: usize,
}

/// The periodic ranking and activity ingester.
pub struct Ingester {
    repo: Arc<Repository>,
    source: Arc<dyn RepoInfoSource>,
    ranking_limit: u32,
    fetch_delay: Duration,
}

impl Ingester {
    pub fn new(repo: Arc<Repository>, source: Arc<dyn RepoInfoSource>, config: &Config) -> Self {
        Self {
            repo,
            source,
            ranking_limit: config.ranking_limit,
            fetch_delay: config.fetch_delay,
        }
    }

    /// One full ingestion run: refresh the ranking, then every repository's
    /// activity.
    pub async fn run_once(&self) -> Result<RunSummary, AppError> {
        tracing::info!("Fetching top {} repositories", self.ranking_limit);
        let fetched = self.source.top_repositories(self.ranking_limit).await?;

        let records = to_rank_records(&fetched);
        self.repo.update_top_repositories(&records).await?;
        tracing::info!("Ranking refreshed with {} repositories", records.len());

        let mut summary = RunSummary {
            repositories: fetched.len(),
            failed: 0,
        };

        for info in &fetched {
            if let Err(e) = self.update_activity(info).await {
                summary.failed += 1;
                tracing::warn!(
                    "Activity update failed for {}/{}: {}",
                    info.owner,
                    info.name,
                    e
                );
            }
            // Throttle requests to avoid hitting API limits
            tokio::time::sleep(self.fetch_delay).await;
        }

        Ok(summary)
    }

    async fn update_activity(&self, info: &RepoInfo) -> Result<(), AppError> {
        let last = self
            .repo
            .last_activity_date(&info.name, &info.owner)
            .await?;

        let until = Utc::now();
        let since = activity_since(last, until.date_naive());
        if last.is_none() {
            tracing::info!(
                "No activity recorded for {}/{}, backfilling from {}",
                info.owner,
                info.name,
                since.date_naive()
            );
        }

        let days = self
            .source
            .repository_activity(&info.owner, &info.name, since, until)
            .await?;

        self.repo
            .upsert_activity(&info.name, &info.owner, &to_activity_records(&days))
            .await?;

        tracing::debug!(
            "Updated activity for {}/{}: {} day(s) from {} to {}",
            info.owner,
            info.name,
            days.len(),
            since.date_naive(),
            until.date_naive()
        );
        Ok(())
    }
}

/// Drive ingestion runs at a fixed period until the task is dropped.
///
/// Each run is awaited to completion before the next tick, so a slow run
/// delays the schedule instead of overlapping it.
pub async fn run_scheduler(ingester: Ingester, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match ingester.run_once().await {
            Ok(summary) => tracing::info!(
                "Ingestion run finished: {} repositories, {} activity failure(s)",
                summary.repositories,
                summary.failed
            ),
            Err(e) => tracing::error!("Ingestion run failed: {}", e),
        }
    }
}

/// Map fetched repositories to ranking rows. Positions are placeholders;
/// the database assigns the real ones while refreshing the snapshot.
fn to_rank_records(fetched: &[RepoInfo]) -> Vec<RepoRecord> {
    fetched
        .iter()
        .map(|info| RepoRecord {
            repo: info.name.clone(),
            owner: info.owner.clone(),
            position_cur: 0,
            position_prev: 0,
            stars: info.stars,
            watchers: info.watchers,
            forks: info.forks,
            open_issues: info.open_issues,
            language: info.language.clone(),
        })
        .collect()
}

fn to_activity_records(days: &[DailyActivity]) -> Vec<ActivityRecord> {
    days.iter()
        .map(|day| ActivityRecord {
            date: day.date,
            commits: day.commits,
            authors: day.authors.clone(),
        })
        .collect()
}

/// Start of the activity fetch window.
///
/// The last recorded day is fetched again because it may have been ingested
/// mid-day; the upsert replaces it with the complete count. Repositories
/// without history are backfilled.
fn activity_since(last: Option<NaiveDate>, today: NaiveDate) -> DateTime<Utc> {
    let day = match last {
        Some(last) => last,
        None => today
            .checked_sub_days(Days::new(BACKFILL_DAYS))
            .unwrap_or(today),
    };
    day.and_time(NaiveTime::MIN).and_utc()
}
