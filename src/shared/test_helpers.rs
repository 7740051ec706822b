use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use crate::features::categories::repositories::InMemoryCategoryRepository;
use crate::features::categories::{routes as categories_routes, CategoryService};

pub const TEST_API_PREFIX: &str = "/api/v1";

pub fn categories_path(suffix: &str) -> String {
    format!("{}/categories{}", TEST_API_PREFIX, suffix)
}

/// Router with the categories feature nested the way `main` nests it
pub fn category_test_server(repository: Arc<InMemoryCategoryRepository>) -> TestServer {
    let service = Arc::new(CategoryService::new(repository));
    let app = Router::new().nest(TEST_API_PREFIX, categories_routes::routes(service));
    TestServer::new(app).expect("Could not create test server.")
}
