//! Document references

use crate::HasId;
use serde::{Deserialize, Serialize};

/// A link from one document to another.
///
/// Storage always holds the `ById` form; read paths inline the full value
/// as `Resolved`. The untagged representation makes the duality visible on
/// the wire: a bare JSON string is a reference, a JSON object is the
/// referenced document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Resolved(T),
    ById(String),
}

impl<T: HasId> Reference<T> {
    /// Id of the referenced document, whichever form the reference is in.
    ///
    /// `None` only for an inlined value the store has not assigned an id
    /// to yet.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Reference::ById(id) => Some(id),
            Reference::Resolved(value) => value.id(),
        }
    }
}

impl<T> Reference<T> {
    /// The inlined value, if this reference carries one.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Reference::Resolved(value) => Some(value),
            Reference::ById(_) => None,
        }
    }
}
