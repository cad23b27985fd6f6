use super::types::Database;
use crate::search::{build_sql, CompositePredicate, SqlValue};
use anyhow::Result;
use chrono::NaiveDate;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Object)]
pub struct Article {
    #[ts(type = "number")]
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub author: String,
    pub content: String,
    #[ts(type = "string")]
    pub publishing_date: NaiveDate,
    /// Sorted, without duplicates
    pub tags: Vec<String>,
}

/// Article fields supplied on creation; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub short_description: String,
    pub author: String,
    pub content: String,
    pub publishing_date: NaiveDate,
    pub tags: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    short_description: String,
    author: String,
    content: String,
    publishing_date: NaiveDate,
    tags: Option<String>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        // Tags cannot contain ',' so group_concat output splits cleanly
        let tags: BTreeSet<String> = row
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            id: row.id,
            title: row.title,
            short_description: row.short_description,
            author: row.author,
            content: row.content,
            publishing_date: row.publishing_date,
            tags: tags.into_iter().collect(),
        }
    }
}

const ARTICLE_SELECT: &str = "SELECT a.id, a.title, a.short_description, a.author, a.content, a.publishing_date, group_concat(t.tag) AS tags FROM articles a LEFT JOIN article_tags t ON t.article_id = a.id";

const ARTICLE_GROUP_ORDER: &str = "GROUP BY a.id ORDER BY a.id ASC";

type FieldSetter = fn(&mut Article, String);

/// Attributes a partial update may overwrite: filter name, column, setter
const UPDATABLE_FIELDS: &[(&str, &str, FieldSetter)] = &[
    ("title", "title", set_title),
    ("shortDescription", "short_description", set_short_description),
    ("author", "author", set_author),
    ("content", "content", set_content),
];

fn set_title(article: &mut Article, value: String) {
    article.title = value;
}

fn set_short_description(article: &mut Article, value: String) {
    article.short_description = value;
}

fn set_author(article: &mut Article, value: String) {
    article.author = value;
}

fn set_content(article: &mut Article, value: String) {
    article.content = value;
}

/// Overwrites the named attributes of `article`. Unknown names are ignored.
/// Returns the `(column, value)` pairs that were applied.
pub fn apply_field_updates(
    article: &mut Article,
    updates: &BTreeMap<String, String>,
) -> Vec<(&'static str, String)> {
    let mut applied = Vec::new();
    for (name, value) in updates {
        match UPDATABLE_FIELDS.iter().find(|(field, _, _)| *field == name.as_str()) {
            Some((_, column, setter)) => {
                setter(article, value.clone());
                applied.push((*column, value.clone()));
            }
            None => tracing::debug!(field = %name, "ignoring update of unknown article field"),
        }
    }
    applied
}

async fn fetch_article(conn: &mut SqliteConnection, id: i64) -> Result<Option<Article>> {
    let query = format!("{} WHERE a.id = ? {}", ARTICLE_SELECT, ARTICLE_GROUP_ORDER);
    let row = sqlx::query_as::<_, ArticleRow>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(Article::from))
}

impl Database {
    /// All articles, ordered by id
    pub async fn list_articles(&self) -> Result<Vec<Article>> {
        let query = format!("{} {}", ARTICLE_SELECT, ARTICLE_GROUP_ORDER);
        let rows = sqlx::query_as::<_, ArticleRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Articles matching every predicate of `filter`.
    ///
    /// An empty filter matches nothing and does not touch the database.
    pub async fn find_articles(&self, filter: &CompositePredicate) -> Result<Vec<Article>> {
        if filter.is_empty() {
            tracing::debug!("empty article filter, returning no results");
            return Ok(Vec::new());
        }

        let (where_clause, values) = build_sql(filter);
        let query = format!(
            "{} WHERE {} {}",
            ARTICLE_SELECT, where_clause, ARTICLE_GROUP_ORDER
        );

        let mut query_builder = sqlx::query_as::<_, ArticleRow>(&query);
        for value in values {
            query_builder = match value {
                SqlValue::String(s) => query_builder.bind(s),
                SqlValue::Integer(i) => query_builder.bind(i),
            };
        }

        let rows = query_builder.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    pub async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let mut conn = self.pool.acquire().await?;
        fetch_article(&mut conn, id).await
    }

    /// Stores a new article with its tags and returns the generated id
    pub async fn create_article(&self, article: &NewArticle) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO articles (title, short_description, author, content, publishing_date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&article.title)
        .bind(&article.short_description)
        .bind(&article.author)
        .bind(&article.content)
        .bind(article.publishing_date)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for tag in &article.tags {
            sqlx::query("INSERT OR IGNORE INTO article_tags (article_id, tag) VALUES (?, ?)")
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    /// Applies a field-by-name merge to an existing article.
    /// Returns the updated article, or `None` if no article has this id.
    ///
    /// Only the columns named in `updates` are written, and the read and the
    /// write share one transaction.
    pub async fn update_article(
        &self,
        id: i64,
        updates: &BTreeMap<String, String>,
    ) -> Result<Option<Article>> {
        let mut tx = self.pool.begin().await?;
        let Some(mut article) = fetch_article(&mut tx, id).await? else {
            return Ok(None);
        };

        let changes = apply_field_updates(&mut article, updates);
        if changes.is_empty() {
            return Ok(Some(article));
        }

        let assignments: Vec<String> = changes
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect();
        let query = format!("UPDATE articles SET {} WHERE id = ?", assignments.join(", "));
        let mut update = sqlx::query(&query);
        for (_, value) in &changes {
            update = update.bind(value.as_str());
        }
        update.bind(id).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(Some(article))
    }

    /// Deletes an article; its tags go with it through `ON DELETE CASCADE`.
    /// Returns the deleted article, or `None` if absent.
    pub async fn delete_article(&self, id: i64) -> Result<Option<Article>> {
        let mut tx = self.pool.begin().await?;
        let Some(article) = fetch_article(&mut tx, id).await? else {
            return Ok(None);
        };

        let deleted = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Ok(None);
        }
        tx.commit().await?;

        Ok(Some(article))
    }
}
