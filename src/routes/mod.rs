use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::services::{ContentProvider, ContentSearch, LikedRepository, TrendingSampler};

pub mod content;
pub mod liked;
pub mod trending;

/// HTTP header carrying the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentProvider>,
    pub search: Arc<ContentSearch>,
    pub trending: Arc<TrendingSampler>,
    pub liked: Arc<LikedRepository>,
    /// Shown on the trending shelf for counters without a poster
    pub placeholder_poster: String,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(content::list))
        .route("/content/:media_type/:id", get(content::details))
        .route("/trending", get(trending::shelf))
        .route("/liked", get(liked::list).post(liked::add))
        .route("/liked/:id", delete(liked::remove))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Request span tagged with the ID set by `SetRequestIdLayer`
fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
