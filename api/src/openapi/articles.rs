use super::common::{ApiResponse, ApiTags, CreateArticleRequest};
use crate::database::{Article, Database, NewArticle};
use crate::search::build_filter;
use crate::validation::{validate_create_article, validate_field_updates, FieldErrors};
use poem::web::Data;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi,
};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct ArticlesApi;

#[OpenApi]
impl ArticlesApi {
    /// List articles
    ///
    /// Returns all articles, or only those matching `search`.
    /// `search` is a `;`-separated list of `field<op>value` clauses where
    /// `op` is `:` (substring), `=` (exact, any-of for `tags=a,b`) or one of
    /// `<`, `<=`, `>`, `>=` (`publishingDate` only, `dd.mm.yyyy`).
    /// An empty `search` matches nothing.
    #[oai(path = "/articles", method = "get", tag = "ApiTags::Articles")]
    async fn list_articles(
        &self,
        db: Data<&Arc<Database>>,
        search: Query<Option<String>>,
    ) -> ListArticlesResponse {
        let result = match search.0.as_deref() {
            None => db.list_articles().await,
            Some(query) => match build_filter(query) {
                Ok(filter) => db.find_articles(&filter).await,
                Err(e) => {
                    tracing::debug!(search = %query, error = %e, "rejected article filter");
                    return ListArticlesResponse::BadRequest(Json(ApiResponse::error(
                        e.to_string(),
                    )));
                }
            },
        };

        match result {
            Ok(articles) => ListArticlesResponse::Ok(Json(ApiResponse::ok(articles))),
            Err(e) => {
                tracing::error!("Failed to list articles: {:#}", e);
                ListArticlesResponse::InternalError(Json(ApiResponse::error(format!(
                    "Failed to list articles: {}",
                    e
                ))))
            }
        }
    }

    /// Get article by ID
    #[oai(path = "/articles/:id", method = "get", tag = "ApiTags::Articles")]
    async fn get_article(&self, db: Data<&Arc<Database>>, id: Path<i64>) -> ArticleResponse {
        match db.get_article(id.0).await {
            Ok(Some(article)) => ArticleResponse::Ok(Json(ApiResponse::ok(article))),
            Ok(None) => ArticleResponse::NotFound(Json(ApiResponse::error(not_found(id.0)))),
            Err(e) => {
                tracing::error!("Failed to get article {}: {:#}", id.0, e);
                ArticleResponse::InternalError(Json(ApiResponse::error(format!(
                    "Database error: {}",
                    e
                ))))
            }
        }
    }

    /// Create article
    ///
    /// Stores a new article published today and returns its ID
    #[oai(path = "/articles", method = "post", tag = "ApiTags::Articles")]
    async fn create_article(
        &self,
        db: Data<&Arc<Database>>,
        req: Json<CreateArticleRequest>,
    ) -> CreateArticleResponse {
        if let Err(errors) = validate_create_article(&req.0) {
            return CreateArticleResponse::ValidationFailed(Json(errors));
        }

        let CreateArticleRequest {
            title,
            short_description,
            author,
            content,
            tags,
        } = req.0;
        let article = NewArticle {
            title,
            short_description,
            author,
            content,
            publishing_date: chrono::Utc::now().date_naive(),
            tags: tags.unwrap_or_default(),
        };

        match db.create_article(&article).await {
            Ok(id) => {
                tracing::info!(id, title = %article.title, "article created");
                CreateArticleResponse::Ok(Json(ApiResponse::ok(id)))
            }
            Err(e) => {
                tracing::error!("Failed to create article: {:#}", e);
                CreateArticleResponse::InternalError(Json(ApiResponse::error(format!(
                    "Failed to create article: {}",
                    e
                ))))
            }
        }
    }

    /// Update article fields
    ///
    /// Overwrites the named fields (`title`, `shortDescription`, `author`,
    /// `content`) after applying the create-time checks; other keys are ignored
    #[oai(path = "/articles/:id", method = "patch", tag = "ApiTags::Articles")]
    async fn update_article(
        &self,
        db: Data<&Arc<Database>>,
        id: Path<i64>,
        updates: Json<BTreeMap<String, String>>,
    ) -> UpdateArticleResponse {
        if let Err(errors) = validate_field_updates(&updates.0) {
            return UpdateArticleResponse::ValidationFailed(Json(errors));
        }

        match db.update_article(id.0, &updates.0).await {
            Ok(Some(_)) => UpdateArticleResponse::Ok(Json(ApiResponse::ok(
                "Article updated successfully".to_string(),
            ))),
            Ok(None) => UpdateArticleResponse::NotFound(Json(ApiResponse::error(not_found(id.0)))),
            Err(e) => {
                tracing::error!("Failed to update article {}: {:#}", id.0, e);
                UpdateArticleResponse::InternalError(Json(ApiResponse::error(format!(
                    "Failed to update article: {}",
                    e
                ))))
            }
        }
    }

    /// Delete article
    #[oai(path = "/articles/:id", method = "delete", tag = "ApiTags::Articles")]
    async fn delete_article(&self, db: Data<&Arc<Database>>, id: Path<i64>) -> MessageResponse {
        match db.delete_article(id.0).await {
            Ok(Some(article)) => {
                tracing::info!(id = id.0, "article deleted");
                MessageResponse::Ok(Json(ApiResponse::ok(format!(
                    "Article \"{}\" deleted successfully",
                    article.title
                ))))
            }
            Ok(None) => MessageResponse::NotFound(Json(ApiResponse::error(not_found(id.0)))),
            Err(e) => {
                tracing::error!("Failed to delete article {}: {:#}", id.0, e);
                MessageResponse::InternalError(Json(ApiResponse::error(format!(
                    "Failed to delete article: {}",
                    e
                ))))
            }
        }
    }
}

fn not_found(id: i64) -> String {
    format!("Article with id {} not found", id)
}

#[derive(poem_openapi::ApiResponse)]
enum ListArticlesResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<Vec<Article>>>),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum ArticleResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<Article>>),
    #[oai(status = 404)]
    NotFound(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum CreateArticleResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<i64>>),
    /// Field name to validation message
    #[oai(status = 400)]
    ValidationFailed(Json<FieldErrors>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum UpdateArticleResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<String>>),
    /// Field name to validation message
    #[oai(status = 400)]
    ValidationFailed(Json<FieldErrors>),
    #[oai(status = 404)]
    NotFound(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
enum MessageResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<String>>),
    #[oai(status = 404)]
    NotFound(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[cfg(test)]
mod tests;
