use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinSet;

use crate::{
    error::{AppError, AppResult},
    models::{CategoryKind, ResultItem, ResultPage},
    services::providers::{MediaCatalog, TextGenerator},
};

/// Upper bound on titles resolved per recommendation request
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Object keys accepted when the model answers with objects instead of strings
const TITLE_KEYS: [&str; 3] = ["title", "name", "MovieName"];

/// Builds the instruction sent to the model for a free-text query
pub fn build_prompt(query: &str) -> String {
    format!(
        "Provide a list of movies or web series based on the following: \"{}\". \
         Return the result as an array. Provide only ten recommendations. \
         Remember to provide the response in the form of an array and nothing else. \
         If you cannot find anything, return an empty array.",
        query
    )
}

/// Removes markdown code-fence markers wherever they appear, then trims
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses repaired model text into an ordered list of titles.
///
/// Anything that is not a JSON array yields an empty list. The failure is
/// logged, never returned.
pub fn parse_recommendations(text: &str) -> Vec<String> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, response = %text, "Error parsing recommendations");
            return Vec::new();
        }
    };

    let Value::Array(entries) = value else {
        tracing::warn!(response = %text, "Recommendations response is not an array");
        return Vec::new();
    };

    let mut titles: Vec<String> = entries
        .iter()
        .filter_map(title_from_entry)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .collect();

    if titles.len() > MAX_RECOMMENDATIONS {
        tracing::warn!(
            received = titles.len(),
            kept = MAX_RECOMMENDATIONS,
            "Model returned more recommendations than requested"
        );
        titles.truncate(MAX_RECOMMENDATIONS);
    }

    titles
}

fn title_from_entry(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(title) => Some(title.as_str()),
        Value::Object(fields) => TITLE_KEYS
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str)),
        _ => None,
    }
}

/// Generates recommendations for a free-text query and resolves them to catalog items
///
/// Pipeline: prompt the model, repair and parse its answer, then look up every
/// title concurrently. An empty list is a valid outcome (zero items, zero
/// pages). Any failed lookup fails the whole request.
pub async fn get_recommendations(
    catalog: Arc<dyn MediaCatalog>,
    generator: Arc<dyn TextGenerator>,
    query: &str,
) -> AppResult<ResultPage> {
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Recommendation query cannot be empty".to_string(),
        ));
    }

    tracing::info!(query = %query, provider = generator.name(), "Requesting recommendations");

    let raw = generator.generate(&build_prompt(query)).await?;
    tracing::debug!(response = %raw, "Raw recommendations response");

    let titles = parse_recommendations(&strip_code_fences(&raw));

    if titles.is_empty() {
        tracing::info!(query = %query, "No recommendations found");
        return Ok(ResultPage::empty());
    }

    resolve_titles(catalog, titles).await
}

/// Looks up each title concurrently and keeps the first match per title
///
/// Output order follows input order. Titles without a match are omitted from
/// `items` and listed in `unmatched`. `total_pages` is always 1. Lookups live
/// in a `JoinSet`, so dropping this future or failing early aborts the rest.
pub async fn resolve_titles(
    catalog: Arc<dyn MediaCatalog>,
    titles: Vec<String>,
) -> AppResult<ResultPage> {
    let mut lookups = JoinSet::new();

    for (index, title) in titles.iter().enumerate() {
        let catalog = Arc::clone(&catalog);
        let title = title.clone();
        lookups.spawn(async move {
            let lookup = catalog.search(CategoryKind::Movie, &title, 1).await;
            (index, lookup)
        });
    }

    let mut first_matches: Vec<Option<ResultItem>> = vec![None; titles.len()];

    while let Some(joined) = lookups.join_next().await {
        let (index, lookup) = joined.map_err(|e| AppError::Internal(e.to_string()))?;
        match lookup {
            Ok(page) => first_matches[index] = page.items.into_iter().next(),
            Err(e) => {
                tracing::error!(title = %titles[index], error = %e, "Recommendation lookup failed");
                return Err(e);
            }
        }
    }

    let mut items = Vec::with_capacity(titles.len());
    let mut unmatched = Vec::new();

    for (title, first_match) in titles.into_iter().zip(first_matches) {
        match first_match {
            Some(item) => items.push(item),
            None => {
                tracing::warn!(title = %title, "No catalog match for recommended title");
                unmatched.push(title);
            }
        }
    }

    tracing::info!(
        resolved = items.len(),
        unmatched = unmatched.len(),
        provider = catalog.name(),
        "Recommendations resolved"
    );

    Ok(ResultPage {
        items,
        total_pages: 1,
        unmatched,
    })
}
