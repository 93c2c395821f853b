//! Conversation repository port.
//!
//! The capability set every storage backend implements. The store talks to
//! exactly one implementation per process and never branches on which one.
//!
//! # Contract
//!
//! - **Owner-scoped**: every read and write filters by owner in the backend
//!   query itself; a record owned by someone else is `NotFound`
//! - **Backend-assigned ids**: `insert` chooses the conversation id
//! - **Opaque instants**: adapters map `Timestamp` to their native
//!   representation and back
//! - **Normalized errors**: "no row/document" becomes `NotFound`, any other
//!   failure becomes `Backend`/`Serialization`; native error types never leak

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{Conversation, ConversationChanges, NewConversation};
use crate::domain::foundation::{ConversationId, UserId};

/// Errors surfaced by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository port for conversation persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find one conversation owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if absent or owned by another user
    /// - `Backend` on persistence failure
    async fn find(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, RepositoryError>;

    /// Find all conversations owned by `owner_id`, newest `created_at` first.
    async fn find_all(&self, owner_id: &UserId) -> Result<Vec<Conversation>, RepositoryError>;

    /// Insert a new conversation and return it with its assigned id.
    async fn insert(&self, conversation: NewConversation) -> Result<Conversation, RepositoryError>;

    /// Write the supplied fields and return the stored result.
    ///
    /// # Errors
    ///
    /// - `NotFound` if absent or owned by another user
    /// - `Backend` on persistence failure
    async fn replace(
        &self,
        id: &ConversationId,
        owner_id: &UserId,
        changes: ConversationChanges,
    ) -> Result<Conversation, RepositoryError>;

    /// Permanently delete a conversation and its messages.
    ///
    /// # Errors
    ///
    /// - `NotFound` if absent or owned by another user
    /// - `Backend` on persistence failure
    async fn remove(&self, id: &ConversationId, owner_id: &UserId) -> Result<(), RepositoryError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ConversationRepository) {}
    }

    #[test]
    fn not_found_displays_id() {
        let err = RepositoryError::NotFound(ConversationId::new("c1"));
        assert_eq!(err.to_string(), "Conversation not found: c1");
    }
}
