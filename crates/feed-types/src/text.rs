//! Text types

use crate::HasId;
use serde::{Deserialize, Serialize};

/// A reserved text record.
///
/// Declared with its own collection but not wired to any route or
/// relationship yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
}

impl HasId for Text {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
