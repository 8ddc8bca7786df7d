use crate::{
    error::{AppError, AppResult},
    models::{ResultPage, SearchRequest, SourceMode},
    services::{
        providers::{MediaCatalog, TextGenerator},
        recommendations,
    },
};
use std::sync::Arc;

/// Service function for the search view
///
/// Direct searches issue exactly one catalog call for the requested page.
/// Recommendation searches ignore the page and go through the resolver.
/// Empty queries are rejected before any network call.
pub async fn dispatch(
    catalog: Arc<dyn MediaCatalog>,
    generator: Arc<dyn TextGenerator>,
    request: &SearchRequest,
) -> AppResult<ResultPage> {
    if request.query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    match request.mode {
        SourceMode::Recommendation => {
            recommendations::get_recommendations(catalog, generator, &request.query).await
        }
        SourceMode::DirectSearch => {
            if request.page == 0 {
                return Err(AppError::InvalidInput(
                    "Page numbers start at 1".to_string(),
                ));
            }

            let page = catalog
                .search(request.category, &request.query, request.page)
                .await?;
            Ok(page.into())
        }
    }
}
