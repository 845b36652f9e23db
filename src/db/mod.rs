//! Database module for PostgreSQL persistence.
//!
//! PostgreSQL is the source of truth for the ranking snapshot and the
//! accumulated activity history.

mod repository;

pub use repository::*;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
pub async fn init_database(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
///
/// The column names, types, and keys of both tables are a fixed external
/// contract; other consumers read them directly.
async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS top100 (
            repo TEXT NOT NULL,
            owner TEXT NOT NULL,
            position_cur INTEGER NOT NULL DEFAULT 0,
            position_prev INTEGER NOT NULL DEFAULT 0,
            stars INTEGER NOT NULL DEFAULT 0,
            watchers INTEGER NOT NULL DEFAULT 0,
            forks INTEGER NOT NULL DEFAULT 0,
            open_issues INTEGER NOT NULL DEFAULT 0,
            language TEXT,
            PRIMARY KEY (repo, owner)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activity (
            date DATE NOT NULL,
            repo TEXT NOT NULL,
            owner TEXT NOT NULL,
            commits INTEGER NOT NULL DEFAULT 0,
            authors TEXT[] NOT NULL,
            PRIMARY KEY (date, repo, owner)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_activity_repo_owner ON activity (repo, owner);",
    )
    .execute(pool)
    .await?;

    Ok(())
}
