use crate::build_app;
use crate::database::test_helpers::setup_test_db;
use crate::database::{Database, NewArticle};
use chrono::NaiveDate;
use poem::http::StatusCode;
use poem::test::TestClient;
use poem::Endpoint;
use serde_json::json;
use std::sync::Arc;

async fn seeded_client() -> (TestClient<impl Endpoint>, Database) {
    let db = setup_test_db().await;
    for (title, author, date, tags) in [
        ("Foo bar", "alice", (2019, 6, 1), vec!["rust"]),
        ("a foo story", "bob", (2020, 1, 1), vec!["b", "c"]),
        ("baz", "alice", (2020, 1, 2), vec!["a"]),
    ] {
        db.create_article(&NewArticle {
            title: title.to_string(),
            short_description: String::new(),
            author: author.to_string(),
            content: "Body".to_string(),
            publishing_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            tags: tags.into_iter().map(str::to_string).collect(),
        })
        .await
        .unwrap();
    }
    (TestClient::new(build_app(Arc::new(db.clone()))), db)
}

#[tokio::test]
async fn test_list_without_search_returns_all() {
    let (cli, _db) = seeded_client().await;

    let resp = cli.get("/api/v1/articles").send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("success").assert_bool(true);
    body.get("data").array().assert_len(3);
}

#[tokio::test]
async fn test_list_with_search_filters() {
    let (cli, _db) = seeded_client().await;

    let resp = cli
        .get("/api/v1/articles")
        .query("search", &"title:foo;author=bob")
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let data = json.value().object().get("data").array();
    data.assert_len(1);
    let article = data.get(0).object();
    article.get("title").assert_string("a foo story");
    article.get("publishing_date").assert_string("2020-01-01");
}

#[tokio::test]
async fn test_list_with_empty_search_returns_nothing() {
    let (cli, _db) = seeded_client().await;

    let resp = cli.get("/api/v1/articles?search=").send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("data").array().assert_len(0);
}

#[tokio::test]
async fn test_list_with_malformed_search_is_bad_request() {
    let (cli, _db) = seeded_client().await;

    for search in ["title", "title<foo", "publishingDate>notadate", "rating=5"] {
        let resp = cli
            .get("/api/v1/articles")
            .query("search", &search)
            .send()
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let json = resp.json().await;
        json.value().object().get("success").assert_bool(false);
    }
}

#[tokio::test]
async fn test_get_article_and_not_found() {
    let (cli, db) = seeded_client().await;
    let id = db.list_articles().await.unwrap()[0].id;

    let resp = cli.get(format!("/api/v1/articles/{}", id)).send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let data = json.value().object().get("data").object();
    data.get("id").assert_i64(id);
    data.get("title").assert_string("Foo bar");

    let resp = cli.get("/api/v1/articles/9999").send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
    let json = resp.json().await;
    json.value()
        .object()
        .get("error")
        .assert_string("Article with id 9999 not found");
}

#[tokio::test]
async fn test_create_article_returns_id() {
    let (cli, db) = seeded_client().await;

    let resp = cli
        .post("/api/v1/articles")
        .body_json(&json!({
            "title": "New post",
            "short_description": "Short",
            "author": "carol",
            "content": "Hello",
            "tags": ["news", "rust"]
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let id = json.value().object().get("data").i64();

    let stored = db.get_article(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "New post");
    assert_eq!(stored.tags, vec!["news".to_string(), "rust".to_string()]);
    assert_eq!(stored.publishing_date, chrono::Utc::now().date_naive());
}

#[tokio::test]
async fn test_create_article_validation_errors_per_field() {
    let (cli, db) = seeded_client().await;

    let resp = cli
        .post("/api/v1/articles")
        .body_json(&json!({
            "title": "",
            "author": "carol",
            "content": " "
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    let errors = json.value().object();
    errors.get("title").assert_string("Title cannot be empty");
    errors.get("content").assert_string("Content cannot be empty");

    assert_eq!(db.list_articles().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_rejects_tags_unreachable_by_filter() {
    let (cli, db) = seeded_client().await;

    let resp = cli
        .post("/api/v1/articles")
        .body_json(&json!({
            "title": "Padded",
            "author": "carol",
            "content": "Hello",
            "tags": [" rust "]
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    json.value()
        .object()
        .get("tags")
        .assert_string("Tag ' rust ' must not start or end with whitespace");

    let resp = cli
        .post("/api/v1/articles")
        .body_json(&json!({
            "title": "Tagged",
            "author": "carol",
            "content": "Hello",
            "tags": ["rust"]
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = cli
        .get("/api/v1/articles")
        .query("search", &"tags= rust ")
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let data = json.value().object().get("data").array();
    data.assert_len(2);
    data.get(1).object().get("title").assert_string("Tagged");
    assert_eq!(db.list_articles().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_patch_article_by_field_name() {
    let (cli, db) = seeded_client().await;
    let id = db.list_articles().await.unwrap()[0].id;

    let resp = cli
        .patch(format!("/api/v1/articles/{}", id))
        .body_json(&json!({"title": "Renamed", "nonsense": "x"}))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(db.get_article(id).await.unwrap().unwrap().title, "Renamed");

    let resp = cli
        .patch("/api/v1/articles/9999")
        .body_json(&json!({"title": "Renamed"}))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_article_validates_values() {
    let (cli, db) = seeded_client().await;
    let id = db.list_articles().await.unwrap()[0].id;

    let resp = cli
        .patch(format!("/api/v1/articles/{}", id))
        .body_json(&json!({"title": "", "author": "dave"}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let json = resp.json().await;
    json.value()
        .object()
        .get("title")
        .assert_string("Title cannot be empty");

    let stored = db.get_article(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Foo bar");
    assert_eq!(stored.author, "alice");
}

#[tokio::test]
async fn test_delete_article() {
    let (cli, db) = seeded_client().await;
    let id = db.list_articles().await.unwrap()[2].id;

    let resp = cli.delete(format!("/api/v1/articles/{}", id)).send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value()
        .object()
        .get("data")
        .assert_string("Article \"baz\" deleted successfully");
    assert!(db.get_article(id).await.unwrap().is_none());

    let resp = cli.delete(format!("/api/v1/articles/{}", id)).send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let (cli, _db) = seeded_client().await;

    let resp = cli.get("/api/v1/health").send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().object().get("success").assert_bool(true);
}
