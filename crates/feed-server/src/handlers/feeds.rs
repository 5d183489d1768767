//! Feed handlers

use crate::services::ServiceError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feed_types::Feed;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Feed>>, StatusCode> {
    match state.feed_service.all_feeds().await {
        Ok(feeds) => Ok(Json(feeds)),
        Err(e) => {
            tracing::error!("Failed to list feeds: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Feed>, StatusCode> {
    match state.feed_service.feed_by_id(&id).await {
        Ok(feed) => Ok(Json(feed)),
        Err(ServiceError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get feed {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(feed): Json<Feed>,
) -> Result<Json<Feed>, StatusCode> {
    match state.feed_service.create(feed).await {
        Ok(created) => Ok(Json(created)),
        // A reference-only body naming a missing message.
        Err(ServiceError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to create feed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(feed): Json<Feed>,
) -> Result<Json<Feed>, StatusCode> {
    match state.feed_service.update(&id, feed).await {
        Ok(updated) => Ok(Json(updated)),
        Err(ServiceError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to update feed {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
