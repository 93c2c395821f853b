//! HTTP DTOs for conversation endpoints.
//!
//! Request fields are all optional so that an absent field reaches the store
//! and fails validation there, with the same error a non-HTTP caller sees.

use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{
    AppendMessageCommand, CreateConversationCommand, UpdateConversationCommand,
};
use crate::domain::conversation::{Conversation, Message, MessageMetadata};
use crate::domain::foundation::OwnedByUser;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateConversationRequest> for CreateConversationCommand {
    fn from(req: CreateConversationRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

/// Request to update a conversation.
///
/// `description` distinguishes absent (unchanged) from `null` (cleared).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl From<UpdateConversationRequest> for UpdateConversationCommand {
    fn from(req: UpdateConversationRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

/// Request to append a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppendMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

impl From<AppendMessageRequest> for AppendMessageCommand {
    fn from(req: AppendMessageRequest) -> Self {
        Self {
            content: req.content,
            role: req.role,
            metadata: req.metadata,
        }
    }
}

/// Maps a present field to `Some`, keeping an explicit `null` as `Some(None)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full conversation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub messages: Vec<Message>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id().to_string(),
            owner_id: conversation.owner_id().to_string(),
            title: conversation.title().to_string(),
            description: conversation.description().map(str::to_string),
            messages: conversation.messages().to_vec(),
            created_at: conversation.created_at().to_rfc3339(),
            updated_at: conversation.updated_at().to_rfc3339(),
        }
    }
}

/// `{conversations: [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationResponse>,
}

/// `{conversation: {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ConversationEnvelope {
    pub conversation: ConversationResponse,
}

/// `{success: true}`
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `{message, conversation}` after an append.
#[derive(Debug, Clone, Serialize)]
pub struct AppendMessageResponse {
    pub message: Message,
    pub conversation: ConversationResponse,
}

/// `{success: true, conversation}` after a message removal.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveMessageResponse {
    pub success: bool,
    pub conversation: ConversationResponse,
}
