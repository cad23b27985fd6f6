mod database;
mod openapi;
mod request_logging;
mod search;
mod validation;

use clap::{Parser, Subcommand};
use database::{Database, DEFAULT_DATABASE_URL};
use poem::{
    handler, listener::TcpListener, middleware::Cors, web::Redirect, Endpoint, EndpointExt,
    Route, Server,
};
use poem_openapi::OpenApiService;
use request_logging::RequestLogging;
use sqlx::SqlitePool;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-api-server")]
#[command(about = "Blog Articles API Server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Check database connectivity and that migrations have been applied
    Doctor,
}

fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Returns whether the article tables exist in the database at `database_url`
async fn check_schema_applied(database_url: &str) -> Result<bool, sqlx::Error> {
    let pool = SqlitePool::connect(database_url).await?;
    let table_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('articles', 'article_tags')",
    )
    .fetch_one(&pool)
    .await?;
    pool.close().await;
    Ok(table_count == 2)
}

#[handler]
fn root_redirect() -> Redirect {
    Redirect::temporary("/api/v1/swagger")
}

fn build_app(database: Arc<Database>) -> impl Endpoint {
    let api_service = OpenApiService::new(
        openapi::create_combined_api(),
        "Blog API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("/api/v1");
    let swagger_ui = api_service.swagger_ui();

    Route::new()
        .at("/", poem::get(root_redirect))
        .nest("/api/v1/swagger", swagger_ui)
        .nest("/api/v1", api_service)
        .data(database)
        .with(Cors::new())
        .with(RequestLogging)
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve => serve_command().await,
        Commands::Doctor => doctor_command().await,
    }
}

async fn serve_command() -> Result<(), std::io::Error> {
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let database_url = database_url();
    let database = match Database::new(&database_url).await {
        Ok(db) => {
            tracing::info!("Database initialized at {}", database_url);
            Arc::new(db)
        }
        Err(e) => {
            tracing::error!("Failed to initialize database at {}: {:#}", database_url, e);
            return Err(std::io::Error::other(format!(
                "Database initialization failed: {}",
                e
            )));
        }
    };

    tracing::info!("Starting Blog API server on {}", addr);
    Server::new(TcpListener::bind(&addr))
        .run(build_app(database))
        .await
}

async fn doctor_command() -> Result<(), std::io::Error> {
    let database_url = database_url();
    match check_schema_applied(&database_url).await {
        Ok(true) => {
            tracing::info!("Database at {} is reachable and migrated", database_url);
            Ok(())
        }
        Ok(false) => Err(std::io::Error::other(format!(
            "Database at {} is reachable but the article schema is missing; start the server once to apply migrations",
            database_url
        ))),
        Err(e) => Err(std::io::Error::other(format!(
            "Cannot connect to database at {}: {}",
            database_url, e
        ))),
    }
}
