//! Message handlers

use crate::services::ServiceError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feed_types::Message;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Message>>, StatusCode> {
    match state.message_service.all_messages().await {
        Ok(messages) => Ok(Json(messages)),
        Err(e) => {
            tracing::error!("Failed to list messages: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, StatusCode> {
    match state.message_service.message_by_id(&id).await {
        Ok(message) => Ok(Json(message)),
        Err(ServiceError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get message {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(message): Json<Message>,
) -> Result<Json<Message>, StatusCode> {
    match state.message_service.create(message).await {
        Ok(created) => Ok(Json(created)),
        Err(e) => {
            tracing::error!("Failed to create message: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(message): Json<Message>,
) -> Result<Json<Message>, StatusCode> {
    match state.message_service.update(&id, message).await {
        Ok(updated) => Ok(Json(updated)),
        Err(ServiceError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to update message {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
