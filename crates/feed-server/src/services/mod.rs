//! Business logic services

pub mod feeds;
pub mod merge;
pub mod messages;
pub mod resolver;

pub use feeds::FeedService;
pub use messages::MessageService;

use crate::storage::StorageError;
use thiserror::Error;

/// Failures surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
