//! Chat messages embedded in a conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp, ValidationError};

/// Free-form key/value metadata attached to a message.
pub type MessageMetadata = serde_json::Map<String, serde_json::Value>;

/// A single message in a conversation.
///
/// `role` is opaque to the store: any non-empty string is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub metadata: MessageMetadata,
    pub timestamp: Timestamp,
}

/// Validated input for a message that has not been appended yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    role: String,
    content: String,
    metadata: MessageMetadata,
}

impl MessageDraft {
    /// Validates raw message input.
    ///
    /// # Errors
    ///
    /// - `MissingField` if `content` or `role` is absent
    /// - `EmptyField` if `role` is empty (empty `content` is allowed)
    pub fn new(
        content: Option<String>,
        role: Option<String>,
        metadata: Option<MessageMetadata>,
    ) -> Result<Self, ValidationError> {
        let content = content.ok_or_else(|| ValidationError::missing_field("content"))?;
        let role = role.ok_or_else(|| ValidationError::missing_field("role"))?;
        if role.is_empty() {
            return Err(ValidationError::empty_field("role"));
        }

        Ok(Self {
            role,
            content,
            metadata: metadata.unwrap_or_default(),
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Stamps the draft with an id and timestamp.
    pub fn into_message(self, id: MessageId, timestamp: Timestamp) -> Message {
        Message {
            id,
            role: self.role,
            content: self.content,
            metadata: self.metadata,
            timestamp,
        }
    }
}
