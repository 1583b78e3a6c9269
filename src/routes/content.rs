use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{ContentDetails, ContentFilter, ContentItem, MediaType},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(default)]
    query: String,
    #[serde(default, rename = "type")]
    filter: ContentFilter,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub results: Vec<ContentItem>,
}

/// Handler for search (non-blank `query`) and discovery (blank or missing `query`)
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ContentQuery>,
) -> AppResult<Json<ContentResponse>> {
    let results = state.search.find(&params.query, params.filter).await?;

    tracing::info!(
        query = %params.query,
        filter = %params.filter,
        results = results.len(),
        "Content listed"
    );

    Ok(Json(ContentResponse { results }))
}

/// Handler for a single movie or TV show
pub async fn details(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(MediaType, u64)>,
) -> AppResult<Json<ContentDetails>> {
    let details = state.content.details(media_type, id).await?;
    Ok(Json(details))
}
