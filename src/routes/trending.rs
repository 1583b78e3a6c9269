use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    models::{MediaType, SearchCounter},
    routes::AppState,
};

/// One slot on the trending shelf, ready for display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendingEntry {
    /// 1-based position on the shelf
    pub rank: usize,
    pub search_term: String,
    pub poster_url: String,
    pub content_id: u64,
    pub media_type: MediaType,
    pub link: String,
}

impl TrendingEntry {
    pub fn from_counter(rank: usize, counter: SearchCounter, placeholder_poster: &str) -> Self {
        let media_type = counter.inferred_media_type();
        Self {
            rank,
            link: format!("/{}/{}", media_type, counter.content_id),
            poster_url: counter
                .poster_url
                .unwrap_or_else(|| placeholder_poster.to_string()),
            search_term: counter.search_term,
            content_id: counter.content_id,
            media_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub items: Vec<TrendingEntry>,
}

/// Handler for the trending shelf.
///
/// A failing store shows up as an empty shelf, never as an error response.
pub async fn shelf(State(state): State<AppState>) -> Json<TrendingResponse> {
    let counters = match state.trending.get_trending().await {
        Ok(counters) => counters,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch trending searches");
            Vec::new()
        }
    };

    let items = counters
        .into_iter()
        .enumerate()
        .map(|(i, counter)| TrendingEntry::from_counter(i + 1, counter, &state.placeholder_poster))
        .collect();

    Json(TrendingResponse { items })
}
