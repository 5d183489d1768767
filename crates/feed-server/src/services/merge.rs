//! Merge-update: partial updates that preserve identity

use crate::services::ServiceError;
use crate::storage::{Entity, Repository};

/// Applies an update as a shallow full-field replacement.
///
/// The incoming entity supplies every field except the identity; the stored
/// entity contributes only its id. This is replacement, not a deep merge:
/// a field the caller leaves at its default is persisted at that default.
/// If no entity exists under `id`, nothing is persisted.
pub async fn merge_update<T: Entity>(
    repo: &Repository<T>,
    id: &str,
    mut incoming: T,
) -> Result<T, ServiceError> {
    if repo.find_by_id(id).await?.is_none() {
        return Err(ServiceError::NotFound);
    }

    incoming.set_id(id.to_string());
    Ok(repo.save(incoming).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DocumentStore, MemoryStore};
    use feed_types::Message;
    use std::sync::Arc;

    fn messages() -> Repository<Message> {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        Repository::new(store)
    }

    #[tokio::test]
    async fn replaces_fields_and_keeps_the_id() {
        let repo = messages();
        let stored = repo
            .save(Message {
                id: None,
                text: "a".to_string(),
            })
            .await
            .unwrap();
        let id = stored.id.clone().unwrap();

        let updated = merge_update(
            &repo,
            &id,
            Message {
                id: None,
                text: "b".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.text, "b");
        assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().text, "b");
    }

    #[tokio::test]
    async fn incoming_id_never_wins_over_the_path_id() {
        let repo = messages();
        let stored = repo
            .save(Message {
                id: None,
                text: "a".to_string(),
            })
            .await
            .unwrap();
        let id = stored.id.clone().unwrap();

        let updated = merge_update(
            &repo,
            &id,
            Message {
                id: Some("smuggled".to_string()),
                text: "b".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert!(repo.find_by_id("smuggled").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_target_is_not_found_and_persists_nothing() {
        let repo = messages();

        let result = merge_update(
            &repo,
            "nope",
            Message {
                id: None,
                text: "b".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
