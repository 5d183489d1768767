//! Feed service: denormalized reads and the two-step write

use crate::services::{merge, resolver, ServiceError};
use crate::storage::{Repository, StorageError};
use feed_types::{Feed, Message, Reference};
use tracing::debug;

/// Read and write paths for feeds.
///
/// Storage always holds the message as a reference by id; every response
/// produced here carries it inlined.
#[derive(Clone)]
pub struct FeedService {
    feeds: Repository<Feed>,
    messages: Repository<Message>,
}

impl FeedService {
    pub fn new(feeds: Repository<Feed>, messages: Repository<Message>) -> Self {
        Self { feeds, messages }
    }

    /// All feeds with their referenced message inlined.
    ///
    /// A feed whose message no longer exists is omitted from the result.
    pub async fn all_feeds(&self) -> Result<Vec<Feed>, ServiceError> {
        let feeds = self.feeds.find_all().await?;

        resolver::inline_join(
            feeds,
            &self.messages,
            |feed: &Feed| feed.message.target_id().map(str::to_owned),
            |feed, message| Feed {
                id: feed.id,
                message: Reference::Resolved(message),
            },
        )
        .await
    }

    /// One feed with its message inlined.
    ///
    /// A dangling message reference reads as `NotFound`, consistent with
    /// the omission on the list path.
    pub async fn feed_by_id(&self, id: &str) -> Result<Feed, ServiceError> {
        let feed = self
            .feeds
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let message_id = feed.message.target_id().ok_or(ServiceError::NotFound)?;
        let message = self
            .messages
            .find_by_id(message_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Ok(Feed {
            id: feed.id,
            message: Reference::Resolved(message),
        })
    }

    /// Persists the embedded message first, then a new feed referencing it.
    ///
    /// The two writes are sequential, not atomic: if the message write
    /// fails no feed is written, but a failure of the feed write leaves the
    /// message behind with nothing pointing at it.
    pub async fn create(&self, incoming: Feed) -> Result<Feed, ServiceError> {
        let message = self.persist_reference(incoming.message).await?;
        let reference = reference_to(&message)?;

        let stored = self
            .feeds
            .save(Feed {
                id: None,
                message: reference,
            })
            .await?;

        debug!(
            "Created feed {:?} referencing message {:?}",
            stored.id, message.id
        );

        Ok(Feed {
            id: stored.id,
            message: Reference::Resolved(message),
        })
    }

    /// Replaces the stored message reference wholesale, keeping the feed id.
    ///
    /// Nothing is persisted when the feed does not exist.
    pub async fn update(&self, id: &str, incoming: Feed) -> Result<Feed, ServiceError> {
        if self.feeds.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }

        let message = self.persist_reference(incoming.message).await?;
        let reference = reference_to(&message)?;

        let stored = merge::merge_update(
            &self.feeds,
            id,
            Feed {
                id: None,
                message: reference,
            },
        )
        .await?;

        Ok(Feed {
            id: stored.id,
            message: Reference::Resolved(message),
        })
    }

    /// An inlined message is persisted (insert or upsert per its id); a
    /// reference by id must name an existing message, so a feed can never
    /// be written pointing at nothing.
    async fn persist_reference(
        &self,
        reference: Reference<Message>,
    ) -> Result<Message, ServiceError> {
        match reference {
            Reference::Resolved(message) => Ok(self.messages.save(message).await?),
            Reference::ById(id) => self
                .messages
                .find_by_id(&id)
                .await?
                .ok_or(ServiceError::NotFound),
        }
    }
}

fn reference_to(message: &Message) -> Result<Reference<Message>, ServiceError> {
    match &message.id {
        Some(id) => Ok(Reference::ById(id.clone())),
        None => Err(ServiceError::Storage(StorageError::InvalidData(
            "persisted message has no id".to_string(),
        ))),
    }
}
