//! Strongly-typed identifier value objects.
//!
//! Conversation and message ids are opaque strings: each backend assigns
//! conversation ids in its own format, and message ids only need to be
//! unique within one conversation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Identifier of a conversation, assigned by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wraps a backend-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a ConversationId from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Interprets the id as a UUID, if it is spelled canonically.
    ///
    /// Only the lowercase hyphenated form is accepted, so one record is
    /// reachable through exactly one id string.
    pub fn to_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.0)
            .ok()
            .filter(|uuid| uuid.hyphenated().to_string() == self.0)
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a new random MessageId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier (e.g. taken from a request path).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// User identifier, resolved upstream by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_generates_unique_values() {
        let id1 = MessageId::generate();
        let id2 = MessageId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn conversation_id_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = ConversationId::from_uuid(uuid);
        assert_eq!(id.to_uuid(), Some(uuid));
    }

    #[test]
    fn conversation_id_rejects_alternate_uuid_spellings() {
        let uuid = Uuid::new_v4();
        let canonical = uuid.to_string();

        for spelling in [
            canonical.to_uppercase(),
            uuid.simple().to_string(),
            uuid.braced().to_string(),
            uuid.urn().to_string(),
        ] {
            assert_eq!(ConversationId::new(spelling.clone()).to_uuid(), None, "{}", spelling);
        }
        assert_eq!(ConversationId::new(canonical).to_uuid(), Some(uuid));
    }

    #[test]
    fn conversation_id_non_uuid_is_opaque() {
        let id = ConversationId::new("Xq3b9LkPz0aW");
        assert_eq!(id.as_str(), "Xq3b9LkPz0aW");
        assert!(id.to_uuid().is_none());
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
    }

    #[test]
    fn user_id_accepts_opaque_provider_ids() {
        let id = UserId::new("firebase|8sJ2k").unwrap();
        assert_eq!(id.as_str(), "firebase|8sJ2k");
        assert_eq!(id.to_string(), "firebase|8sJ2k");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = MessageId::new("m-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"m-1\"");
    }
}
