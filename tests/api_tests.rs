use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};

use movieflixx_api::{
    db::{MemoryDocumentStore, MemoryKeyValueStore},
    error::{AppError, AppResult},
    models::{ContentDetails, ContentFilter, ContentItem, MediaType, SearchCounter},
    routes::{create_router, AppState},
    services::{
        providers::merge_by_popularity, ContentProvider, ContentSearch, LikedRepository,
        SearchRecorder, TrendingSampler,
    },
};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const PLACEHOLDER: &str = "/no-poster.png";

/// Serves a fixed catalogue instead of calling TMDB
struct CatalogueProvider {
    movies: Vec<ContentItem>,
    shows: Vec<ContentItem>,
}

fn item(id: u64, title: &str, poster_path: Option<&str>, popularity: f64) -> ContentItem {
    ContentItem {
        id,
        title: Some(title.to_string()),
        overview: None,
        poster_path: poster_path.map(str::to_string),
        release_date: Some("2020-01-01".to_string()),
        original_language: Some("en".to_string()),
        vote_average: Some(7.5),
        popularity: Some(popularity),
        media_type: MediaType::Movie,
    }
}

impl CatalogueProvider {
    fn new() -> Self {
        Self {
            movies: vec![
                item(603, "The Matrix", Some("/matrix.jpg"), 80.0),
                item(438631, "Dune", None, 150.0),
            ],
            shows: vec![item(1396, "Breaking Bad", Some("/bb.jpg"), 120.0)],
        }
    }

    fn matching(&self, query: &str, filter: ContentFilter) -> Vec<ContentItem> {
        let query = query.to_lowercase();
        let pick = |items: &[ContentItem]| -> Vec<ContentItem> {
            items
                .iter()
                .filter(|i| {
                    i.title
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&query))
                })
                .cloned()
                .collect()
        };

        match filter {
            ContentFilter::Movie => pick(&self.movies),
            ContentFilter::Tv => {
                let mut shows = pick(&self.shows);
                shows.iter_mut().for_each(|s| s.media_type = MediaType::Tv);
                shows
            }
            ContentFilter::Both => merge_by_popularity(vec![
                (MediaType::Movie, pick(&self.movies)),
                (MediaType::Tv, pick(&self.shows)),
            ]),
        }
    }
}

#[async_trait::async_trait]
impl ContentProvider for CatalogueProvider {
    async fn search(&self, query: &str, filter: ContentFilter) -> AppResult<Vec<ContentItem>> {
        Ok(self.matching(query, filter))
    }

    async fn discover(&self, filter: ContentFilter) -> AppResult<Vec<ContentItem>> {
        Ok(self.matching("", filter))
    }

    async fn details(&self, media_type: MediaType, id: u64) -> AppResult<ContentDetails> {
        let found = match media_type {
            MediaType::Movie => self.movies.iter().find(|i| i.id == id),
            MediaType::Tv => self.shows.iter().find(|i| i.id == id),
        };

        let item = found.ok_or_else(|| AppError::NotFound(format!("/{}/{}", media_type, id)))?;
        Ok(serde_json::from_value(json!({
            "id": item.id,
            "title": item.title,
            "media_type": media_type,
        }))?)
    }

    fn name(&self) -> &'static str {
        "catalogue"
    }
}

struct TestApp {
    server: TestServer,
    store: Arc<MemoryDocumentStore>,
}

fn create_test_app(documents: Vec<SearchCounter>) -> TestApp {
    let store = Arc::new(MemoryDocumentStore::with_documents(documents));
    let provider: Arc<dyn ContentProvider> = Arc::new(CatalogueProvider::new());
    let recorder = Arc::new(
        SearchRecorder::new(store.clone(), IMAGE_BASE.to_string()).with_media_type(true),
    );

    let state = AppState {
        content: provider.clone(),
        search: Arc::new(ContentSearch::new(provider, recorder)),
        trending: Arc::new(TrendingSampler::with_rng(
            store.clone(),
            20,
            5,
            StdRng::seed_from_u64(17),
        )),
        liked: Arc::new(LikedRepository::new(
            Arc::new(MemoryKeyValueStore::new()),
            "likedMovies".to_string(),
        )),
        placeholder_poster: PLACEHOLDER.to_string(),
    };

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        store,
    }
}

fn counter(i: u64, count: u64) -> SearchCounter {
    SearchCounter {
        id: format!("doc{}", i),
        search_term: format!("term {}", i),
        count,
        poster_url: Some(format!("https://img.test/{}.jpg", i)),
        content_id: i,
        media_type: Some(MediaType::Movie),
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(vec![]);
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let app = create_test_app(vec![]);
    let response = app.server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(!header.is_empty());
}

#[tokio::test]
async fn test_search_then_trending() {
    let app = create_test_app(vec![]);

    let response = app
        .server
        .get("/api/v1/content")
        .add_query_param("query", "dune")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"][0]["id"], 438631);

    let response = app.server.get("/api/v1/trending").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["rank"], 1);
    assert_eq!(items[0]["search_term"], "dune");
    assert_eq!(items[0]["content_id"], 438631);
    // Dune has no poster in the catalogue
    assert_eq!(items[0]["poster_url"], PLACEHOLDER);
    assert_eq!(items[0]["link"], "/movie/438631");
}

#[tokio::test]
async fn test_repeat_search_increments_counter() {
    let app = create_test_app(vec![]);

    for _ in 0..3 {
        app.server
            .get("/api/v1/content")
            .add_query_param("query", "Matrix")
            .add_query_param("type", "movie")
            .await
            .assert_status_ok();
    }

    let documents = app.store.snapshot().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].count, 3);
    assert_eq!(
        documents[0].poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/matrix.jpg")
    );
}

#[tokio::test]
async fn test_both_search_merges_by_popularity() {
    let app = create_test_app(vec![]);

    // "e" matches all three titles
    let response = app
        .server
        .get("/api/v1/content")
        .add_query_param("query", "e")
        .await;
    let body: Value = response.json();
    let ids: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();

    assert_eq!(ids, vec![438631, 1396, 603]);
    assert_eq!(body["results"][1]["media_type"], "tv");

    let documents = app.store.snapshot().await;
    assert_eq!(documents[0].content_id, 438631);
}

#[tokio::test]
async fn test_tv_search_records_tv_link() {
    let app = create_test_app(vec![]);

    app.server
        .get("/api/v1/content")
        .add_query_param("query", "breaking")
        .add_query_param("type", "tv")
        .await
        .assert_status_ok();

    let body: Value = app.server.get("/api/v1/trending").await.json();
    assert_eq!(body["items"][0]["link"], "/tv/1396");
    assert_eq!(
        body["items"][0]["poster_url"],
        "https://image.tmdb.org/t/p/w500/bb.jpg"
    );
}

#[tokio::test]
async fn test_discovery_does_not_record() {
    let app = create_test_app(vec![]);

    let response = app.server.get("/api/v1/content").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 3);

    assert!(app.store.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_no_results_not_recorded() {
    let app = create_test_app(vec![]);

    let response = app
        .server
        .get("/api/v1/content")
        .add_query_param("query", "zzzz")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["results"].as_array().unwrap().is_empty());

    assert!(app.store.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_trending_shelf_capped_and_ranked() {
    let app = create_test_app((0..12).map(|i| counter(i, i + 1)).collect());

    let body: Value = app.server.get("/api/v1/trending").await.json();
    let items = body["items"].as_array().unwrap();

    assert_eq!(items.len(), 5);
    let ranks: Vec<u64> = items.iter().map(|i| i["rank"].as_u64().unwrap()).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

    let mut terms: Vec<&str> = items
        .iter()
        .map(|i| i["search_term"].as_str().unwrap())
        .collect();
    terms.sort();
    terms.dedup();
    assert_eq!(terms.len(), 5);
}

#[tokio::test]
async fn test_trending_store_failure_yields_empty_shelf() {
    let app = create_test_app(vec![counter(1, 5)]);
    app.store.set_unavailable(true);

    let response = app.server.get("/api/v1/trending").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_succeeds_when_store_is_down() {
    let app = create_test_app(vec![]);
    app.store.set_unavailable(true);

    app.server
        .get("/api/v1/content")
        .add_query_param("query", "dune")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_details() {
    let app = create_test_app(vec![]);

    let response = app.server.get("/api/v1/content/tv/1396").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "Breaking Bad");
    assert_eq!(body["media_type"], "tv");

    app.server
        .get("/api/v1/content/movie/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .get("/api/v1/content/podcast/1")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_liked_flow() {
    let app = create_test_app(vec![]);
    let show = json!({
        "id": 1396,
        "title": "Breaking Bad",
        "poster_path": "/bb.jpg",
        "vote_average": 8.9,
        "first_air_date": "2008-01-20",
        "original_language": "en",
        "media_type": "tv"
    });
    let movie = json!({"id": 603, "title": "The Matrix", "media_type": "movie"});

    app.server
        .post("/api/v1/liked")
        .json(&show)
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/api/v1/liked")
        .json(&show)
        .await
        .assert_status(StatusCode::OK);
    app.server
        .post("/api/v1/liked")
        .json(&movie)
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = app.server.get("/api/v1/liked").await.json();
    assert_eq!(body["total"], 2);

    let body: Value = app
        .server
        .get("/api/v1/liked")
        .add_query_param("filter", "tv")
        .await
        .json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], 1396);
    assert_eq!(body["items"][0]["release_date"], "2008-01-20");

    app.server
        .delete("/api/v1/liked/1396")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .delete("/api/v1/liked/1396")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let body: Value = app.server.get("/api/v1/liked").await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], 603);
}
