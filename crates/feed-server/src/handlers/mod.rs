//! HTTP handlers

pub mod feeds;
pub mod messages;

use axum::http::StatusCode;

/// Liveness probe.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
