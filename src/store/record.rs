//! User record types shared by the principal store and the replica mirror.
//!
//! These are the only payloads that cross the wire between the two services.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the principal store.
///
/// Ids are allocated from a monotonically increasing counter starting at 1 and are
/// never reused, even after the record they belonged to is deleted.
pub type RecordId = i64;

/// A single user record.
///
/// There is no version or timestamp field: replicas can only tell records apart by
/// `id`, which is why synchronization always ships the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Server-assigned identifier, immutable after creation
    pub id: RecordId,
    /// Display name
    pub name: String,
    /// Handle
    pub username: String,
}

impl Record {
    /// Builds a record from client input and an id chosen by the store.
    pub fn from_input(id: RecordId, input: RecordInput) -> Self {
        Record {
            id,
            name: input.name,
            username: input.username,
        }
    }
}

/// Body accepted by create and update.
///
/// Any `id` present in the request body is ignored; the store owns id allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    pub username: String,
}

impl RecordInput {
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        RecordInput {
            name: name.into(),
            username: username.into(),
        }
    }
}

/// Result of a dirty-flag check, `{"newChanges": bool}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCheck {
    #[serde(rename = "newChanges")]
    pub new_changes: bool,
}

impl ChangeCheck {
    pub fn new(new_changes: bool) -> Self {
        ChangeCheck { new_changes }
    }
}
