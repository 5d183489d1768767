//! In-memory document store using DashMap (for tests and ephemeral runs)

use super::{Document, DocumentStore, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;

/// Document store holding everything in process memory.
///
/// Same contract as the SQLite backend; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<(String, String), Entry>,
}

struct Entry {
    body: Value,
    created_at: DateTime<Utc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        let mut documents: Vec<Document> = self
            .data
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| Document {
                id: entry.key().1.clone(),
                body: entry.value().body.clone(),
                created_at: entry.value().created_at,
            })
            .collect();

        documents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        let key = (collection.to_string(), id.to_string());

        Ok(self.data.get(&key).map(|entry| Document {
            id: id.to_string(),
            body: entry.body.clone(),
            created_at: entry.created_at,
        }))
    }

    async fn insert(&self, collection: &str, body: Value) -> Result<Document, StorageError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.data.insert(
            (collection.to_string(), id.clone()),
            Entry {
                body: body.clone(),
                created_at,
            },
        );

        Ok(Document {
            id,
            body,
            created_at,
        })
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<Document, StorageError> {
        let key = (collection.to_string(), id.to_string());

        // Keep the original created_at on upsert so list order stays stable.
        let created_at = self
            .data
            .get(&key)
            .map(|entry| entry.created_at)
            .unwrap_or_else(Utc::now);

        self.data.insert(
            key,
            Entry {
                body: body.clone(),
                created_at,
            },
        );

        Ok(Document {
            id: id.to_string(),
            body,
            created_at,
        })
    }
}
