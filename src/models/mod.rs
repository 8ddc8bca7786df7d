use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Kind of catalog item. Serialized as TMDB's own path segment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl CategoryKind {
    /// Path segment used by `/search/{segment}`
    pub fn path_segment(&self) -> &'static str {
        match self {
            CategoryKind::Movie => "movie",
            CategoryKind::Series => "tv",
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// How results are obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Paginated catalog search
    DirectSearch,
    /// Model-suggested titles resolved against the catalog
    Recommendation,
}

/// Tabs shown above the result grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Movies,
    Series,
    Recommendations,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Movies, Tab::Series, Tab::Recommendations];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Movies => "Search Movies",
            Tab::Series => "Search TV Series",
            Tab::Recommendations => "AI Recommendation",
        }
    }

    /// Shown when a search completed with no items
    pub fn empty_message(&self) -> &'static str {
        match self {
            Tab::Movies => "No Movies Found",
            Tab::Series => "No Series Found",
            Tab::Recommendations => "No Recommendations Found",
        }
    }

    pub fn source_mode(&self) -> SourceMode {
        match self {
            Tab::Movies | Tab::Series => SourceMode::DirectSearch,
            Tab::Recommendations => SourceMode::Recommendation,
        }
    }

    /// Catalog kind searched from this tab; recommendations resolve to movies
    pub fn category(&self) -> CategoryKind {
        match self {
            Tab::Series => CategoryKind::Series,
            Tab::Movies | Tab::Recommendations => CategoryKind::Movie,
        }
    }
}

impl TryFrom<u8> for Tab {
    type Error = AppError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Tab::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown tab index {}", index)))
    }
}

/// Accepts a tab name ("movies", "series", "recommendations") or its index
impl FromStr for Tab {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = value.parse::<u8>() {
            return Tab::try_from(index);
        }

        match value.to_ascii_lowercase().as_str() {
            "movies" => Ok(Tab::Movies),
            "series" => Ok(Tab::Series),
            "recommendations" => Ok(Tab::Recommendations),
            _ => Err(AppError::InvalidInput(format!("Unknown tab {}", value))),
        }
    }
}

/// One dispatch of the search view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub category: CategoryKind,
    pub mode: SourceMode,
    /// 1-based page number; ignored in recommendation mode
    pub page: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, tab: Tab, page: u32) -> Self {
        Self {
            query: query.into(),
            category: tab.category(),
            mode: tab.source_mode(),
            page,
        }
    }
}

/// A single movie or series returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultItem {
    pub id: u64,
    pub poster_path: Option<String>,
    pub title: String,
    pub date: Option<String>,
    pub media_kind: CategoryKind,
    pub vote_average: Option<f64>,
}

/// A full page of results. Replaces the previous page wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResultPage {
    pub items: Vec<ResultItem>,
    pub total_pages: u32,
    /// Recommended titles the catalog had no match for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}

impl ResultPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from `GET /search/{movie|tv}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMediaRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A movie or TV record. Movies carry `title`/`release_date`, series carry
/// `name`/`first_air_date`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMediaRecord {
    pub id: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// TMDB sends "" for unknown dates and posters
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TmdbMediaRecord {
    /// Normalizes a record into a `ResultItem` of the searched kind.
    ///
    /// Returns `None` for records with neither a title nor a name.
    pub fn into_result_item(self, kind: CategoryKind) -> Option<ResultItem> {
        let title = match kind {
            CategoryKind::Movie => non_empty(self.title).or_else(|| non_empty(self.name)),
            CategoryKind::Series => non_empty(self.name).or_else(|| non_empty(self.title)),
        }?;

        let date = match kind {
            CategoryKind::Movie => {
                non_empty(self.release_date).or_else(|| non_empty(self.first_air_date))
            }
            CategoryKind::Series => {
                non_empty(self.first_air_date).or_else(|| non_empty(self.release_date))
            }
        };

        Some(ResultItem {
            id: self.id,
            poster_path: non_empty(self.poster_path),
            title,
            date,
            media_kind: kind,
            vote_average: self.vote_average,
        })
    }
}

/// A catalog page before it is handed to the view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogPage {
    pub items: Vec<ResultItem>,
    pub total_pages: u32,
}

impl CatalogPage {
    pub fn from_response(response: TmdbSearchResponse, kind: CategoryKind) -> Self {
        let items = response
            .results
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                let item = record.into_result_item(kind);
                if item.is_none() {
                    tracing::debug!(tmdb_id = id, "Dropping TMDB record without a title");
                }
                item
            })
            .collect();

        Self {
            items,
            total_pages: response.total_pages,
        }
    }
}

impl From<CatalogPage> for ResultPage {
    fn from(page: CatalogPage) -> Self {
        Self {
            items: page.items,
            total_pages: page.total_pages,
            unmatched: Vec::new(),
        }
    }
}

// ============================================================================
// Gemini API Types
// ============================================================================

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    /// Single-turn request carrying one text part
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it produced any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        Some(text)
    }
}
