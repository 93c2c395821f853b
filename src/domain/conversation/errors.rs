//! Conversation-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ConversationId, ErrorCode, MessageId, ValidationError};

/// Errors returned by conversation store operations.
///
/// `NotFound` covers both a missing conversation and one owned by another
/// user; callers cannot tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// Required input was missing or empty.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Conversation does not exist for this owner.
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    /// Conversation exists but holds no message with this id.
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    /// Storage backend failure. The message is for server-side logs only.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl ConversationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConversationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        ConversationError::Backend(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ConversationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ConversationError::NotFound(_) => ErrorCode::ConversationNotFound,
            ConversationError::MessageNotFound(_) => ErrorCode::MessageNotFound,
            ConversationError::Backend(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for ConversationError {
    fn from(err: ValidationError) -> Self {
        ConversationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
