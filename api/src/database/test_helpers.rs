/// Shared test helpers for database tests
use super::Database;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Set up an in-memory test database with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::from_str("sqlite::memory:")
                .expect("valid in-memory URL")
                .foreign_keys(true),
        )
        .await
        .expect("Failed to open in-memory SQLite database");

    sqlx::raw_sql(include_str!("../../migrations/001_articles.sql"))
        .execute(&pool)
        .await
        .expect("Migration failed");

    Database { pool }
}
