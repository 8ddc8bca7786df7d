use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use mockall::{mock, predicate::eq};
use serde_json::{json, Value};

use media_search::{
    error::{AppError, AppResult},
    models::{CatalogPage, CategoryKind, ResultItem},
    routes::{create_router, AppState},
    services::providers::{MediaCatalog, TextGenerator},
};

mock! {
    pub Catalog {}

    #[async_trait::async_trait]
    impl MediaCatalog for Catalog {
        async fn search(&self, category: CategoryKind, query: &str, page: u32) -> AppResult<CatalogPage>;
        fn name(&self) -> &'static str;
    }
}

mock! {
    pub Generator {}

    #[async_trait::async_trait]
    impl TextGenerator for Generator {
        async fn generate(&self, prompt: &str) -> AppResult<String>;
        fn name(&self) -> &'static str;
    }
}

fn movie(id: u64, title: &str) -> ResultItem {
    ResultItem {
        id,
        poster_path: Some(format!("/{}.jpg", id)),
        title: title.to_string(),
        date: Some("2010-07-15".to_string()),
        media_kind: CategoryKind::Movie,
        vote_average: Some(8.4),
    }
}

fn idle_generator() -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator.expect_generate().never();
    generator.expect_name().return_const("mock");
    generator
}

fn create_test_server(catalog: MockCatalog, generator: MockGenerator) -> TestServer {
    let state = AppState::new(
        Arc::new(catalog),
        Arc::new(generator),
        "https://image.tmdb.org/t/p/w300".to_string(),
    );
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(MockCatalog::new(), idle_generator());
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_search_series_page() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .with(eq(CategoryKind::Series), eq("office"), eq(2))
        .times(1)
        .returning(|_, _, _| {
            Ok(CatalogPage {
                items: vec![ResultItem {
                    id: 2316,
                    poster_path: None,
                    title: "The Office".to_string(),
                    date: Some("2005-03-24".to_string()),
                    media_kind: CategoryKind::Series,
                    vote_average: Some(8.6),
                }],
                total_pages: 4,
            })
        });
    let server = create_test_server(catalog, idle_generator());

    let response = server
        .get("/api/v1/search")
        .add_query_param("q", "office")
        .add_query_param("tab", "series")
        .add_query_param("page", 2)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_pages"], 4);
    assert_eq!(body["items"][0]["title"], "The Office");
    assert_eq!(body["items"][0]["media_kind"], "tv");
}

#[tokio::test]
async fn test_search_accepts_tab_index() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .with(eq(CategoryKind::Series), eq("office"), eq(1))
        .times(1)
        .returning(|_, _, _| Ok(CatalogPage::default()));
    let server = create_test_server(catalog, idle_generator());

    let response = server
        .get("/api/v1/search")
        .add_query_param("q", "office")
        .add_query_param("tab", 1)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_search_unknown_tab_is_bad_request() {
    let mut catalog = MockCatalog::new();
    catalog.expect_search().never();
    let server = create_test_server(catalog, idle_generator());

    let response = server
        .get("/api/v1/search")
        .add_query_param("q", "office")
        .add_query_param("tab", 9)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_empty_query_is_bad_request() {
    let mut catalog = MockCatalog::new();
    catalog.expect_search().never();
    let server = create_test_server(catalog, idle_generator());

    let response = server.get("/api/v1/search").add_query_param("q", "").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_upstream_failure_is_bad_gateway() {
    let mut catalog = MockCatalog::new();
    catalog.expect_search().returning(|_, _, _| {
        Err(AppError::ExternalApi(
            "TMDB API returned status 401 Unauthorized".to_string(),
        ))
    });
    let server = create_test_server(catalog, idle_generator());

    let response = server.get("/api/v1/search").add_query_param("q", "heat").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_recommendations_endpoint_preserves_order() {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_| Ok("```json\n[\"Inception\",\"Arrival\"]\n```".to_string()));
    generator.expect_name().return_const("mock");

    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .with(eq(CategoryKind::Movie), eq("Inception"), eq(1))
        .times(1)
        .returning(|_, _, _| {
            Ok(CatalogPage {
                items: vec![movie(27205, "Inception")],
                total_pages: 1,
            })
        });
    catalog
        .expect_search()
        .with(eq(CategoryKind::Movie), eq("Arrival"), eq(1))
        .times(1)
        .returning(|_, _, _| {
            Ok(CatalogPage {
                items: vec![movie(329865, "Arrival")],
                total_pages: 1,
            })
        });
    catalog.expect_name().return_const("mock");

    let server = create_test_server(catalog, generator);
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "cerebral sci-fi")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["items"][0]["title"], "Inception");
    assert_eq!(body["items"][1]["title"], "Arrival");
    assert_eq!(body["total_pages"], 1);
}

#[tokio::test]
async fn test_view_flow() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_search()
        .with(eq(CategoryKind::Movie), eq("inception"), eq(1))
        .times(1)
        .returning(|_, _, _| {
            Ok(CatalogPage {
                items: vec![movie(27205, "Inception")],
                total_pages: 3,
            })
        });
    catalog
        .expect_search()
        .with(eq(CategoryKind::Movie), eq("inception"), eq(2))
        .times(1)
        .returning(|_, _, _| {
            Err(AppError::ExternalApi(
                "TMDB API returned status 503".to_string(),
            ))
        });
    let server = create_test_server(catalog, idle_generator());

    // Initial view has nothing to show
    let response = server.get("/api/v1/view").await;
    response.assert_status_ok();
    let view: Value = response.json();
    assert_eq!(view["cards"].as_array().unwrap().len(), 0);
    assert_eq!(view["tab"], "movies");
    assert_eq!(view["tabs"].as_array().unwrap().len(), 3);

    // Typing does not search
    let response = server
        .post("/api/v1/view/query")
        .json(&json!({ "query": "inception" }))
        .await;
    let view: Value = response.json();
    assert_eq!(view["query"], "inception");
    assert_eq!(view["cards"].as_array().unwrap().len(), 0);

    let response = server.post("/api/v1/view/search").await;
    let body: Value = response.json();
    assert_eq!(body["outcome"], "applied");
    assert_eq!(body["view"]["cards"][0]["title"], "Inception");
    assert_eq!(
        body["view"]["cards"][0]["poster_url"],
        "https://image.tmdb.org/t/p/w300/27205.jpg"
    );
    assert_eq!(body["view"]["cards"][0]["media_type"], "movie");
    assert_eq!(body["view"]["show_pagination"], true);

    // A failed page change leaves the grid alone
    let response = server
        .post("/api/v1/view/page")
        .json(&json!({ "page": 2 }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["outcome"], "failed");
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert_eq!(body["view"]["cards"][0]["title"], "Inception");
}

#[tokio::test]
async fn test_view_tab_change_with_empty_query_is_skipped() {
    let mut catalog = MockCatalog::new();
    catalog.expect_search().never();
    let server = create_test_server(catalog, idle_generator());

    let response = server
        .post("/api/v1/view/tab")
        .json(&json!({ "tab": "recommendations" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["outcome"], "skipped");
    assert_eq!(body["view"]["tab"], "recommendations");
    assert_eq!(body["view"]["page"], 1);
}
