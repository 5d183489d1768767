//! Typed repositories over the document store

use super::{Document, DocumentStore, StorageError};
use feed_types::{Feed, HasId, Message, Text};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// A document type bound to its collection.
pub trait Entity: HasId + Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;
}

impl Entity for Feed {
    const COLLECTION: &'static str = "feeds";
}

impl Entity for Message {
    const COLLECTION: &'static str = "messages";
}

impl Entity for Text {
    const COLLECTION: &'static str = "texts";
}

/// Typed CRUD primitives over one collection.
///
/// No validation and no uniqueness beyond the store's primary key.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<T>, StorageError> {
        let documents = self.store.list(T::COLLECTION).await?;
        documents.into_iter().map(from_document).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Inserts when the entity has no id (the store assigns one), replaces
    /// the document at that id otherwise. Returns the persisted entity with
    /// its id set.
    pub async fn save(&self, mut entity: T) -> Result<T, StorageError> {
        let body = serde_json::to_value(&entity)?;
        let document = match entity.id().map(str::to_owned) {
            Some(id) => self.store.replace(T::COLLECTION, &id, body).await?,
            None => self.store.insert(T::COLLECTION, body).await?,
        };
        entity.set_id(document.id);
        Ok(entity)
    }
}

/// The column id is authoritative; whatever id the body may carry is
/// overwritten by it.
fn from_document<T: Entity>(document: Document) -> Result<T, StorageError> {
    let mut entity: T = serde_json::from_value(document.body)?;
    entity.set_id(document.id);
    Ok(entity)
}
