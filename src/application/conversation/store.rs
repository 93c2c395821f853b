//! ConversationStore - backend-agnostic façade over the repository port.
//!
//! Every operation is scoped to an authenticated owner. Mutations follow
//! validate → lock → read/authorize → compute → write, with the lock keyed
//! by conversation id (see `ConversationLocks`).

use std::sync::Arc;

use crate::domain::conversation::{
    sequence, validate_title, Conversation, ConversationChanges, ConversationError, Message,
    MessageDraft, NewConversation,
};
use crate::domain::foundation::{ConversationId, MessageId, OwnedByUser, Timestamp, UserId};
use crate::ports::{ConversationRepository, RepositoryError};

use super::commands::{AppendMessageCommand, CreateConversationCommand, UpdateConversationCommand};
use super::locks::ConversationLocks;

/// Result of appending a message.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendMessageResult {
    pub message: Message,
    pub conversation: Conversation,
}

/// Conversation store façade.
///
/// Cheap to clone; clones share the repository and the lock table.
#[derive(Clone)]
pub struct ConversationStore {
    repository: Arc<dyn ConversationRepository>,
    locks: Arc<ConversationLocks>,
}

impl ConversationStore {
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            repository,
            locks: Arc::new(ConversationLocks::new()),
        }
    }

    /// All conversations of `owner_id`, newest first. Empty is not an error.
    pub async fn list(&self, owner_id: &UserId) -> Result<Vec<Conversation>, ConversationError> {
        let mut conversations = self
            .repository
            .find_all(owner_id)
            .await
            .map_err(map_repository_error)?;

        conversations.retain(|c| c.is_owner(owner_id));
        conversations.sort_by(|a, b| b.created_at().cmp(a.created_at()));

        tracing::debug!(
            user_id = %owner_id,
            count = conversations.len(),
            "Listed conversations"
        );

        Ok(conversations)
    }

    /// One conversation of `owner_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if absent or owned by another user
    pub async fn get(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, ConversationError> {
        self.load(owner_id, id).await
    }

    /// Create a conversation with no messages.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is absent or blank; nothing is written
    pub async fn create(
        &self,
        owner_id: &UserId,
        cmd: CreateConversationCommand,
    ) -> Result<Conversation, ConversationError> {
        let new_conversation = NewConversation::new(owner_id.clone(), cmd.title, cmd.description)?;

        let conversation = self
            .repository
            .insert(new_conversation)
            .await
            .map_err(map_repository_error)?;

        tracing::info!(
            conversation_id = %conversation.id(),
            user_id = %owner_id,
            "Conversation created"
        );

        Ok(conversation)
    }

    /// Change title and/or description. Always refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a supplied title is blank
    /// - `NotFound` if absent or owned by another user
    pub async fn update(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
        cmd: UpdateConversationCommand,
    ) -> Result<Conversation, ConversationError> {
        let title = cmd.title.map(|t| validate_title(Some(t))).transpose()?;

        let _guard = self.locks.acquire(id).await;
        let current = self.load(owner_id, id).await?;

        let mut changes = ConversationChanges::touch(Timestamp::now_not_before(current.updated_at()));
        if let Some(title) = title {
            changes = changes.with_title(title);
        }
        if let Some(description) = cmd.description {
            changes = changes.with_description(description);
        }

        let conversation = self.write(owner_id, id, changes).await?;

        tracing::info!(conversation_id = %id, user_id = %owner_id, "Conversation updated");

        Ok(conversation)
    }

    /// Permanently delete a conversation with all of its messages.
    ///
    /// # Errors
    ///
    /// - `NotFound` if absent or owned by another user
    pub async fn delete(&self, owner_id: &UserId, id: &ConversationId) -> Result<(), ConversationError> {
        let _guard = self.locks.acquire(id).await;
        self.load(owner_id, id).await?;

        self.repository
            .remove(id, owner_id)
            .await
            .map_err(map_repository_error)?;

        tracing::info!(conversation_id = %id, user_id = %owner_id, "Conversation deleted");

        Ok(())
    }

    /// Append a message at the end of the conversation.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content or role is missing, or role is empty
    /// - `NotFound` if absent or owned by another user
    pub async fn append_message(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
        cmd: AppendMessageCommand,
    ) -> Result<AppendMessageResult, ConversationError> {
        let draft = MessageDraft::new(cmd.content, cmd.role, cmd.metadata)?;

        let _guard = self.locks.acquire(id).await;
        let current = self.load(owner_id, id).await?;

        let now = Timestamp::now_not_before(current.updated_at());
        let (message, messages) = sequence::append(current.messages(), draft, now);

        let conversation = self
            .write(owner_id, id, ConversationChanges::touch(now).with_messages(messages))
            .await?;

        tracing::info!(
            conversation_id = %id,
            message_id = %message.id,
            role = %message.role,
            "Message appended"
        );

        Ok(AppendMessageResult {
            message,
            conversation,
        })
    }

    /// Remove one message, keeping the others in order.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation is absent or owned by another user
    /// - `MessageNotFound` if the conversation has no such message; nothing
    ///   is written
    pub async fn remove_message(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<Conversation, ConversationError> {
        let _guard = self.locks.acquire(id).await;
        let current = self.load(owner_id, id).await?;

        let messages = sequence::remove(current.messages(), message_id)
            .ok_or_else(|| ConversationError::MessageNotFound(message_id.clone()))?;

        let now = Timestamp::now_not_before(current.updated_at());
        let conversation = self
            .write(owner_id, id, ConversationChanges::touch(now).with_messages(messages))
            .await?;

        tracing::info!(conversation_id = %id, message_id = %message_id, "Message removed");

        Ok(conversation)
    }

    /// Readiness check against the active backend.
    pub async fn ping(&self) -> Result<(), ConversationError> {
        self.repository.ping().await.map_err(map_repository_error)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn load(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, ConversationError> {
        let conversation = self
            .repository
            .find(owner_id, id)
            .await
            .map_err(map_repository_error)?;

        if !conversation.is_owner(owner_id) {
            tracing::warn!(conversation_id = %id, "Backend returned a record for another owner");
            return Err(ConversationError::NotFound(id.clone()));
        }

        Ok(conversation)
    }

    async fn write(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
        changes: ConversationChanges,
    ) -> Result<Conversation, ConversationError> {
        self.repository
            .replace(id, owner_id, changes)
            .await
            .map_err(map_repository_error)
    }
}

fn map_repository_error(err: RepositoryError) -> ConversationError {
    match err {
        RepositoryError::NotFound(id) => ConversationError::NotFound(id),
        RepositoryError::Backend(msg) => ConversationError::Backend(msg),
        RepositoryError::Serialization(msg) => {
            ConversationError::Backend(format!("Stored record is unreadable: {}", msg))
        }
    }
}
