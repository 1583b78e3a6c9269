use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{ContentItem, LikedFilter, LikedItem},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LikedQuery {
    #[serde(default)]
    filter: LikedFilter,
}

#[derive(Debug, Serialize)]
pub struct LikedResponse {
    pub items: Vec<LikedItem>,
    pub total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LikedQuery>,
) -> AppResult<Json<LikedResponse>> {
    let items = state.liked.list(params.filter).await?;
    let total = items.len();
    Ok(Json(LikedResponse { items, total }))
}

/// Likes a content item. 201 when newly added, 200 when it was already liked.
pub async fn add(
    State(state): State<AppState>,
    Json(item): Json<ContentItem>,
) -> AppResult<(StatusCode, Json<LikedItem>)> {
    let liked = LikedItem::from(item);
    let added = state.liked.add(liked.clone()).await?;

    tracing::info!(id = liked.id, media_type = %liked.media_type, added, "Like requested");

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(liked)))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<u64>) -> AppResult<StatusCode> {
    if state.liked.remove(id).await? {
        tracing::info!(id, "Unliked item");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("liked item {}", id)))
    }
}
