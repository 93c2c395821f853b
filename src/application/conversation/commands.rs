//! Inputs of the mutating conversation store operations.
//!
//! Fields mirror what a client may or may not have sent, so absence can be
//! told apart from an explicit empty value. Validation happens in the store.

use crate::domain::conversation::MessageMetadata;

/// Create a conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateConversationCommand {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Partially update a conversation.
///
/// `None` leaves a field unchanged. For `description`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateConversationCommand {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

/// Append a message to a conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendMessageCommand {
    pub content: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<MessageMetadata>,
}

impl CreateConversationCommand {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl AppendMessageCommand {
    pub fn new(content: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            role: Some(role.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
