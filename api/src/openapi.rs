pub mod articles;
pub mod common;
pub mod system;

pub use articles::ArticlesApi;
pub use system::SystemApi;

use poem_openapi::OpenApi;

/// Combines all API modules into a single OpenAPI specification
pub fn create_combined_api() -> impl OpenApi {
    (SystemApi, ArticlesApi)
}
