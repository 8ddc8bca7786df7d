/// TMDB search provider
///
/// Wraps `GET /search/{movie|tv}`. Every call is a fresh request; nothing is
/// cached between searches.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogPage, CategoryKind, TmdbSearchResponse},
    services::providers::MediaCatalog,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    fn search_url(&self, category: CategoryKind) -> String {
        format!("{}/search/{}", self.api_url, category.path_segment())
    }
}

#[async_trait::async_trait]
impl MediaCatalog for TmdbProvider {
    async fn search(
        &self,
        category: CategoryKind,
        query: &str,
        page: u32,
    ) -> AppResult<CatalogPage> {
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page = page.to_string();
        let response = self
            .http_client
            .get(self.search_url(category))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("query", query),
                ("page", page.as_str()),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let search_response: TmdbSearchResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(
                    error = %e,
                    response = %response_text,
                    "Failed to deserialize TMDB response"
                );
                AppError::MalformedResponse(format!("Failed to parse TMDB response: {}", e))
            })?;

        let catalog_page = CatalogPage::from_response(search_response, category);

        tracing::info!(
            query = %query,
            category = %category,
            page = %page,
            results = catalog_page.items.len(),
            total_pages = catalog_page.total_pages,
            provider = "tmdb",
            "Title search completed"
        );

        Ok(catalog_page)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
