use std::sync::Arc;

use media_search::{
    config::Config,
    routes::{create_router, AppState},
    services::providers::{GeminiProvider, TmdbProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("media_search=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.search_language.clone(),
    ));
    let generator = Arc::new(GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));

    let state = AppState::new(catalog, generator, config.tmdb_image_url.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, model = %config.gemini_model, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
