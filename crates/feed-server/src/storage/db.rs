//! SQLite-backed document store (embedded, no external dependencies)

use super::{Document, DocumentStore, StorageError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Documents live in a single table keyed by `(collection, id)`, with the
/// body stored as JSON text.
pub struct SqliteStore {
    pool: Arc<SqlitePool>,
}

impl SqliteStore {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path).parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Document store initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, body, created_at FROM documents
            WHERE collection = ?1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StorageError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, body, created_at FROM documents
            WHERE collection = ?1 AND id = ?2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn insert(&self, collection: &str, body: Value) -> Result<Document, StorageError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(serde_json::to_string(&body)?)
        .bind(created_at)
        .execute(&*self.pool)
        .await?;

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
        let created_at = Utc::now();

        // Upsert; the original created_at is kept so list order stays stable.
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(serde_json::to_string(&body)?)
        .bind(created_at)
        .execute(&*self.pool)
        .await?;

        Ok(Document {
            id: id.to_string(),
            body,
            created_at,
        })
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    body: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, StorageError> {
        Ok(Document {
            id: self.id,
            body: serde_json::from_str(&self.body)?,
            created_at: self.created_at,
        })
    }
}
