//! Feed types

use crate::{HasId, Message, Reference};
use serde::{Deserialize, Serialize};

/// A wrapper pointing at one message.
///
/// The stored form keeps the message as a reference by id; denormalized
/// read responses carry it inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: Reference<Message>,
}

impl HasId for Feed {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_form_round_trips() {
        let feed = Feed {
            id: Some("f1".to_string()),
            message: Reference::ById("m1".to_string()),
        };
        let value = serde_json::to_value(&feed).unwrap();
        assert_eq!(value, serde_json::json!({"id": "f1", "message": "m1"}));
        let back: Feed = serde_json::from_value(value).unwrap();
        assert_eq!(back, feed);
    }

    #[test]
    fn submitted_form_carries_an_embedded_message() {
        let feed: Feed = serde_json::from_str(r#"{"message":{"text":"hi"}}"#).unwrap();
        assert_eq!(feed.id, None);
        assert_eq!(
            feed.message.resolved().map(|m| m.text.as_str()),
            Some("hi")
        );
    }
}
