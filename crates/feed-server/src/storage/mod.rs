//! Storage layer
//!
//! A document store behind a trait, with SQLite (embedded) and DashMap
//! (in-memory) backends, plus typed repositories on top.

pub mod db;
pub mod memory;
pub mod repository;

pub use db::SqliteStore;
pub use memory::MemoryStore;
pub use repository::{Entity, Repository};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// A schema-flexible record keyed by collection and id.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub body: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid persisted document: {0}")]
    InvalidData(String),
}

/// Per-collection CRUD primitives of a document store.
///
/// Identifiers are store-assigned strings: `insert` mints a fresh UUID,
/// `replace` upserts at a caller-supplied id. References between documents
/// are not followed by the store itself.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of one collection, newest first.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StorageError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError>;

    /// Stores a new document under a freshly assigned id.
    async fn insert(&self, collection: &str, body: Value) -> Result<Document, StorageError>;

    /// Stores the document under the given id, replacing any previous body.
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<Document, StorageError>;
}
