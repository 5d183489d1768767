//! Message service

use crate::services::{merge, ServiceError};
use crate::storage::Repository;
use feed_types::Message;

#[derive(Clone)]
pub struct MessageService {
    messages: Repository<Message>,
}

impl MessageService {
    pub fn new(messages: Repository<Message>) -> Self {
        Self { messages }
    }

    pub async fn all_messages(&self) -> Result<Vec<Message>, ServiceError> {
        Ok(self.messages.find_all().await?)
    }

    pub async fn message_by_id(&self, id: &str) -> Result<Message, ServiceError> {
        self.messages
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Pass-through save: an absent id means insert, a present one upserts.
    pub async fn create(&self, message: Message) -> Result<Message, ServiceError> {
        Ok(self.messages.save(message).await?)
    }

    pub async fn update(&self, id: &str, incoming: Message) -> Result<Message, ServiceError> {
        merge::merge_update(&self.messages, id, incoming).await
    }
}
