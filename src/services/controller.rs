use serde::Serialize;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{CategoryKind, ResultItem, ResultPage, SearchRequest, Tab},
    services::{
        providers::{MediaCatalog, TextGenerator},
        title_search,
    },
};

/// Result of one dispatch as seen by the view
#[derive(Debug)]
pub enum SearchOutcome {
    /// New results replaced the previous page
    Applied { items: usize, total_pages: u32 },
    /// The search succeeded with no items; the previous page was replaced
    Empty,
    /// Nothing to search for; no request was made
    Skipped,
    /// A newer dispatch was issued before this one completed; result discarded
    Stale,
    /// The request failed; the previous page is still shown
    Failed(AppError),
}

impl SearchOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            SearchOutcome::Applied { .. } => "applied",
            SearchOutcome::Empty => "empty",
            SearchOutcome::Skipped => "skipped",
            SearchOutcome::Stale => "stale",
            SearchOutcome::Failed(_) => "failed",
        }
    }
}

/// One grid card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemCard {
    pub id: u64,
    pub poster_url: Option<String>,
    pub title: String,
    pub date: Option<String>,
    pub media_type: CategoryKind,
    pub vote_average: Option<f64>,
}

impl ItemCard {
    fn from_item(item: &ResultItem, image_base_url: &str) -> Self {
        Self {
            id: item.id,
            poster_url: item
                .poster_path
                .as_ref()
                .map(|path| format!("{}/{}", image_base_url, path.trim_start_matches('/'))),
            title: item.title.clone(),
            date: item.date.clone(),
            media_type: item.media_kind,
            vote_average: item.vote_average,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TabView {
    pub tab: Tab,
    pub label: &'static str,
    pub selected: bool,
}

/// Everything the renderer needs to draw the search view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewSnapshot {
    pub query: String,
    pub tab: Tab,
    pub tabs: Vec<TabView>,
    pub page: u32,
    pub total_pages: u32,
    pub show_pagination: bool,
    pub cards: Vec<ItemCard>,
    pub unmatched: Vec<String>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone)]
struct ViewState {
    query: String,
    tab: Tab,
    page: u32,
    results: ResultPage,
    searched: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            tab: Tab::default(),
            page: 1,
            results: ResultPage::empty(),
            searched: false,
        }
    }
}

/// State holder for the search view
///
/// Every dispatch takes a token from a monotonically increasing counter.
/// A completed dispatch is applied only if its token is still the latest one
/// issued, so a slow response can never overwrite a fresher one.
pub struct SearchController {
    catalog: Arc<dyn MediaCatalog>,
    generator: Arc<dyn TextGenerator>,
    image_base_url: String,
    state: RwLock<ViewState>,
    latest_token: AtomicU64,
}

impl SearchController {
    pub fn new(
        catalog: Arc<dyn MediaCatalog>,
        generator: Arc<dyn TextGenerator>,
        image_base_url: String,
    ) -> Self {
        Self {
            catalog,
            generator,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            state: RwLock::new(ViewState::default()),
            latest_token: AtomicU64::new(0),
        }
    }

    /// Updates the query text. Typing never triggers a search.
    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.query = query.into();
    }

    /// Runs the search for the current query, tab and page
    pub async fn submit(&self) -> SearchOutcome {
        let request = {
            let state = self.state.read().await;
            SearchRequest::new(state.query.clone(), state.tab, state.page)
        };
        self.run(request).await
    }

    /// Switches tabs, returns to page 1 and searches again
    pub async fn select_tab(&self, tab: Tab) -> SearchOutcome {
        {
            let mut state = self.state.write().await;
            state.tab = tab;
            state.page = 1;
        }
        self.submit().await
    }

    /// Moves to another page and searches again
    pub async fn set_page(&self, page: u32) -> SearchOutcome {
        if page == 0 {
            return SearchOutcome::Failed(AppError::InvalidInput(
                "Page numbers start at 1".to_string(),
            ));
        }

        self.state.write().await.page = page;
        self.submit().await
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.read().await;
        let total_pages = state.results.total_pages;

        let empty_message = (state.searched
            && !state.query.is_empty()
            && state.results.is_empty())
        .then(|| state.tab.empty_message());

        ViewSnapshot {
            query: state.query.clone(),
            tab: state.tab,
            tabs: Tab::ALL
                .iter()
                .map(|tab| TabView {
                    tab: *tab,
                    label: tab.label(),
                    selected: *tab == state.tab,
                })
                .collect(),
            page: state.page,
            total_pages,
            show_pagination: total_pages > 1,
            cards: state
                .results
                .items
                .iter()
                .map(|item| ItemCard::from_item(item, &self.image_base_url))
                .collect(),
            unmatched: state.results.unmatched.clone(),
            empty_message,
        }
    }

    async fn run(&self, request: SearchRequest) -> SearchOutcome {
        // Taken before the empty check so a skipped interaction still
        // supersedes any response in flight.
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;

        if request.query.is_empty() {
            tracing::debug!(token = token, "Empty query, skipping search");
            return SearchOutcome::Skipped;
        }

        tracing::info!(
            token = token,
            query = %request.query,
            mode = ?request.mode,
            category = %request.category,
            page = request.page,
            "Dispatching search"
        );

        let result = title_search::dispatch(
            Arc::clone(&self.catalog),
            Arc::clone(&self.generator),
            &request,
        )
        .await;

        let mut state = self.state.write().await;

        let latest = self.latest_token.load(Ordering::SeqCst);
        if token != latest {
            tracing::warn!(token = token, latest = latest, "Discarding stale search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                let outcome = if page.is_empty() {
                    SearchOutcome::Empty
                } else {
                    SearchOutcome::Applied {
                        items: page.items.len(),
                        total_pages: page.total_pages,
                    }
                };
                state.results = page;
                state.searched = true;
                outcome
            }
            Err(e) => {
                tracing::error!(
                    token = token,
                    error = %e,
                    "Search failed, keeping previous results"
                );
                SearchOutcome::Failed(e)
            }
        }
    }
}
