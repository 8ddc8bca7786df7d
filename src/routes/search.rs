use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ResultPage, SearchRequest, Tab},
    routes::AppState,
    services::{recommendations, title_search},
};

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    /// Tab name or index; defaults to movies
    #[serde(default)]
    tab: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    q: String,
}

/// Handler for stateless searches
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ResultPage>> {
    let tab = match params.tab.as_deref() {
        Some(tab) => tab.parse::<Tab>()?,
        None => Tab::default(),
    };
    let request = SearchRequest::new(params.q, tab, params.page);
    let page = title_search::dispatch(
        Arc::clone(&state.catalog),
        Arc::clone(&state.generator),
        &request,
    )
    .await?;
    Ok(Json(page))
}

/// Handler for recommendation lookups
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<ResultPage>> {
    let page = recommendations::get_recommendations(
        Arc::clone(&state.catalog),
        Arc::clone(&state.generator),
        &params.q,
    )
    .await?;
    Ok(Json(page))
}
