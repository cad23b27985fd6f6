/// Default database URL for local development
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./blog.db?mode=rwc";

pub mod articles;
pub mod core;
pub mod types;

// Re-export main types
pub use articles::{Article, NewArticle};
pub use types::Database;

#[cfg(test)]
pub mod test_helpers;
