/// External service abstractions
///
/// The search view talks to two remote services: a media catalog (TMDB) and a
/// generative text model (Gemini). Both are injected as trait objects so the
/// controller and the resolver can run against stubs.
use crate::{
    error::AppResult,
    models::{CatalogPage, CategoryKind},
};

pub mod gemini;
pub mod tmdb;

pub use gemini::GeminiProvider;
pub use tmdb::TmdbProvider;

/// Trait for media catalogs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Search one page of the catalog for titles of the given kind
    ///
    /// Adult content is always excluded. `page` is 1-based.
    async fn search(&self, category: CategoryKind, query: &str, page: u32)
        -> AppResult<CatalogPage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for single-turn text generation
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit one prompt and return the model's raw text answer
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
