//! Database repository for ranking and activity operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use crate::errors::AppError;
use crate::models::{ActivityRecord, RepoRecord, SortField};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== RANKING OPERATIONS ====================

    /// The current ranking snapshot, ordered descending by the given field.
    pub async fn list_top(&self, sort: SortField) -> Result<Vec<RepoRecord>, AppError> {
        // The column name comes from a closed enum, never from user input.
        let query = format!(
            "SELECT repo, owner, position_cur, position_prev, stars, watchers, forks, open_issues, language \
             FROM top100 ORDER BY {} DESC LIMIT 100",
            sort.as_column()
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(repo_from_row).collect())
    }

    /// Refresh the ranking snapshot from a freshly fetched batch.
    ///
    /// Upserts every record, then recomputes positions from star counts, all
    /// inside one transaction so readers never observe a half-refreshed
    /// ranking. Positions in the input are ignored; they are assigned here.
    pub async fn update_top_repositories(&self, records: &[RepoRecord]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"INSERT INTO top100 (repo, owner, position_cur, position_prev, stars, watchers, forks, open_issues, language)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                   ON CONFLICT (repo, owner) DO UPDATE
                   SET stars = EXCLUDED.stars,
                       watchers = EXCLUDED.watchers,
                       forks = EXCLUDED.forks,
                       open_issues = EXCLUDED.open_issues,
                       language = EXCLUDED.language"#,
            )
            .bind(&record.repo)
            .bind(&record.owner)
            .bind(record.position_cur)
            .bind(record.position_prev)
            .bind(record.stars)
            .bind(record.watchers)
            .bind(record.forks)
            .bind(record.open_issues)
            .bind(&record.language)
            .execute(&mut *tx)
            .await?;
        }

        // Dense positions 1..N from the fresh star counts; the old current
        // position becomes the previous one.
        sqlx::query(
            r#"WITH ranked_repos AS (
                   SELECT repo, owner,
                          ROW_NUMBER() OVER (ORDER BY stars DESC) AS new_position
                   FROM top100
               )
               UPDATE top100
               SET position_prev = COALESCE(position_cur, 0),
                   position_cur = ranked_repos.new_position
               FROM ranked_repos
               WHERE top100.repo = ranked_repos.repo
                 AND top100.owner = ranked_repos.owner"#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==================== ACTIVITY OPERATIONS ====================

    /// Activity rows for a repository within an optional inclusive window,
    /// oldest first.
    pub async fn get_activity(
        &self,
        repo: &str,
        owner: &str,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let rows = sqlx::query(
            r#"SELECT date, commits, authors
               FROM activity
               WHERE repo = $1 AND owner = $2
                 AND ($3::date IS NULL OR date >= $3)
                 AND ($4::date IS NULL OR date <= $4)
               ORDER BY date ASC"#,
        )
        .bind(repo)
        .bind(owner)
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(activity_from_row).collect())
    }

    /// Insert or update activity rows for a repository.
    ///
    /// Re-ingesting a day that already exists replaces its commit count and
    /// author set; the (date, repo, owner) key never duplicates.
    pub async fn upsert_activity(
        &self,
        repo: &str,
        owner: &str,
        days: &[ActivityRecord],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for day in days {
            sqlx::query(
                r#"INSERT INTO activity (date, repo, owner, commits, authors)
                   VALUES ($1, $2, $3, $4, $5)
                   ON CONFLICT (date, repo, owner) DO UPDATE
                   SET commits = EXCLUDED.commits,
                       authors = EXCLUDED.authors"#,
            )
            .bind(day.date)
            .bind(repo)
            .bind(owner)
            .bind(day.commits)
            .bind(&day.authors)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The most recent recorded activity date for a repository, if any.
    pub async fn last_activity_date(
        &self,
        repo: &str,
        owner: &str,
    ) -> Result<Option<NaiveDate>, AppError> {
        let row = sqlx::query(
            "SELECT MAX(date) AS last_date FROM activity WHERE repo = $1 AND owner = $2",
        )
        .bind(repo)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("last_date"))
    }
}

// Helper functions for row conversion

fn repo_from_row(row: &sqlx::postgres::PgRow) -> RepoRecord {
    RepoRecord {
        repo: row.get("repo"),
        owner: row.get("owner"),
        position_cur: row.get("position_cur"),
        position_prev: row.get("position_prev"),
        stars: row.get("stars"),
        watchers: row.get("watchers"),
        forks: row.get("forks"),
        open_issues: row.get("open_issues"),
        language: row.get("language"),
    }
}

fn activity_from_row(row: &sqlx::postgres::PgRow) -> ActivityRecord {
    ActivityRecord {
        date: row.get("date"),
        commits: row.get("commits"),
        authors: row.get("authors"),
    }
}
