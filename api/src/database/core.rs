use super::types::Database;
use anyhow::Result;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        // Tag rows are removed through ON DELETE CASCADE
        let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    /// Test helper method to access the underlying pool
    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_creates_schema_in_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("blog.db").display());

        let db = Database::new(&url).await.unwrap();
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('articles', 'article_tags') ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        assert_eq!(tables, vec!["article_tags".to_string(), "articles".to_string()]);

        // Running migrations a second time against the same file is a no-op
        drop(db);
        assert!(Database::new(&url).await.is_ok());
    }

    #[tokio::test]
    async fn test_new_fails_for_unreachable_path() {
        let result = Database::new("sqlite:/nonexistent-dir/blog.db").await;
        assert!(result.is_err());
    }
}
