//! In-Memory Conversation Repository
//!
//! Keeps conversations in a process-local map. Data is lost on restart.
//! Useful for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::conversation::{Conversation, ConversationChanges, NewConversation};
use crate::domain::foundation::{ConversationId, OwnedByUser, UserId};
use crate::ports::{ConversationRepository, RepositoryError};

/// In-memory storage for conversations
#[derive(Debug, Clone)]
pub struct InMemoryConversationRepository {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored conversations across all owners
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

impl Default for InMemoryConversationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, RepositoryError> {
        let conversations = self.conversations.read().await;
        conversations
            .get(id)
            .filter(|c| c.is_owner(owner_id))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn find_all(&self, owner_id: &UserId) -> Result<Vec<Conversation>, RepositoryError> {
        let conversations = self.conversations.read().await;
        let mut owned: Vec<Conversation> = conversations
            .values()
            .filter(|c| c.is_owner(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(owned)
    }

    async fn insert(&self, conversation: NewConversation) -> Result<Conversation, RepositoryError> {
        let mut conversations = self.conversations.write().await;

        let mut id = ConversationId::from_uuid(Uuid::new_v4());
        while conversations.contains_key(&id) {
            id = ConversationId::from_uuid(Uuid::new_v4());
        }

        let conversation = conversation.into_conversation(id.clone());
        conversations.insert(id, conversation.clone());
        Ok(conversation)
    }

    async fn replace(
        &self,
        id: &ConversationId,
        owner_id: &UserId,
        changes: ConversationChanges,
    ) -> Result<Conversation, RepositoryError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(id)
            .filter(|c| c.is_owner(owner_id))
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        conversation.apply_changes(changes);
        Ok(conversation.clone())
    }

    async fn remove(&self, id: &ConversationId, owner_id: &UserId) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.write().await;
        match conversations.get(id) {
            Some(c) if c.is_owner(owner_id) => {
                conversations.remove(id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(id.clone())),
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
