use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    models::Tab,
    routes::AppState,
    services::{SearchOutcome, ViewSnapshot},
};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: Tab,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: u32,
}

/// Outcome of a view interaction plus the view it left behind
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub view: ViewSnapshot,
}

impl ViewResponse {
    fn new(outcome: SearchOutcome, view: ViewSnapshot) -> Self {
        let error = match &outcome {
            SearchOutcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };

        Self {
            outcome: outcome.status(),
            error,
            view,
        }
    }
}

/// Current view state
pub async fn snapshot(State(state): State<AppState>) -> Json<ViewSnapshot> {
    Json(state.controller.snapshot().await)
}

/// Update the query text without searching
pub async fn set_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<ViewSnapshot> {
    state.controller.set_query(request.query).await;
    Json(state.controller.snapshot().await)
}

/// Search button
pub async fn submit(State(state): State<AppState>) -> Json<ViewResponse> {
    let outcome = state.controller.submit().await;
    Json(ViewResponse::new(outcome, state.controller.snapshot().await))
}

/// Tab change
pub async fn select_tab(
    State(state): State<AppState>,
    Json(request): Json<TabRequest>,
) -> Json<ViewResponse> {
    let outcome = state.controller.select_tab(request.tab).await;
    Json(ViewResponse::new(outcome, state.controller.snapshot().await))
}

/// Pagination change
pub async fn set_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Json<ViewResponse> {
    let outcome = state.controller.set_page(request.page).await;
    Json(ViewResponse::new(outcome, state.controller.snapshot().await))
}
