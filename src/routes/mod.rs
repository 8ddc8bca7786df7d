use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{
    providers::{MediaCatalog, TextGenerator},
    SearchController,
};

pub mod search;
pub mod view;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MediaCatalog>,
    pub generator: Arc<dyn TextGenerator>,
    pub controller: Arc<SearchController>,
}

impl AppState {
    /// Builds the state and the view controller around the given providers
    pub fn new(
        catalog: Arc<dyn MediaCatalog>,
        generator: Arc<dyn TextGenerator>,
        image_base_url: String,
    ) -> Self {
        let controller = Arc::new(SearchController::new(
            Arc::clone(&catalog),
            Arc::clone(&generator),
            image_base_url,
        ));

        Self {
            catalog,
            generator,
            controller,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/recommendations", get(search::recommend))
        .route("/view", get(view::snapshot))
        .route("/view/query", post(view::set_query))
        .route("/view/search", post(view::submit))
        .route("/view/tab", post(view::select_tab))
        .route("/view/page", post(view::set_page))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
