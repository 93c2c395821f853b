//! Redis-backed document store for conversations.
//!
//! Each conversation is one JSON document under `{prefix}conversation:{id}`
//! with camelCase field names and epoch-millisecond instants. A sorted set
//! per owner (`{prefix}owner:{owner}:conversations`, scored by creation
//! millis) serves the list query. Document and index are always written in
//! a single MULTI/EXEC.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::conversation::{Conversation, ConversationChanges, Message, NewConversation};
use crate::domain::foundation::{ConversationId, OwnedByUser, Timestamp, UserId};
use crate::ports::{ConversationRepository, RepositoryError};

/// Stored shape of a conversation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationDocument {
    user_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
    created_at: i64,
    updated_at: i64,
}

impl ConversationDocument {
    fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            user_id: conversation.owner_id().as_str().to_string(),
            title: conversation.title().to_string(),
            description: conversation.description().map(str::to_string),
            messages: conversation.messages().to_vec(),
            created_at: conversation.created_at().as_unix_millis(),
            updated_at: conversation.updated_at().as_unix_millis(),
        }
    }

    fn into_conversation(self, id: ConversationId) -> Result<Conversation, RepositoryError> {
        let owner_id = UserId::new(self.user_id)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let created_at = millis_to_timestamp(self.created_at)?;
        let updated_at = millis_to_timestamp(self.updated_at)?;

        Ok(Conversation::reconstitute(
            id,
            owner_id,
            self.title,
            self.description,
            self.messages,
            created_at,
            updated_at,
        ))
    }
}

/// Redis document-store implementation of ConversationRepository.
#[derive(Clone)]
pub struct RedisConversationRepository {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisConversationRepository {
    /// Create a repository over an established multiplexed connection.
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    fn document_key(&self, id: &ConversationId) -> String {
        format!("{}conversation:{}", self.key_prefix, id)
    }

    fn owner_index_key(&self, owner_id: &UserId) -> String {
        format!("{}owner:{}:conversations", self.key_prefix, owner_id)
    }

    async fn load_document(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, RepositoryError> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(self.document_key(id))
            .await
            .map_err(|e| redis_error("read conversation", e))?;

        let raw = raw.ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let conversation = parse_document(&raw)?.into_conversation(id.clone())?;

        if !conversation.is_owner(owner_id) {
            return Err(RepositoryError::NotFound(id.clone()));
        }

        Ok(conversation)
    }
}

#[async_trait]
impl ConversationRepository for RedisConversationRepository {
    async fn find(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, RepositoryError> {
        self.load_document(owner_id, id).await
    }

    async fn find_all(&self, owner_id: &UserId) -> Result<Vec<Conversation>, RepositoryError> {
        let mut conn = self.conn.clone();

        let ids: Vec<String> = conn
            .zrevrange(self.owner_index_key(owner_id), 0, -1)
            .await
            .map_err(|e| redis_error("read owner index", e))?;

        // MGET rejects an empty key list.
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ConversationId> = ids.into_iter().map(ConversationId::new).collect();
        let keys: Vec<String> = ids.iter().map(|id| self.document_key(id)).collect();

        let raws: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("read conversations", e))?;

        let mut conversations = Vec::with_capacity(ids.len());
        for (id, raw) in ids.into_iter().zip(raws) {
            // Index entries can outlive their document only if a writer died mid-way.
            let Some(raw) = raw else {
                tracing::warn!(conversation_id = %id, "Owner index points at a missing document");
                continue;
            };
            let conversation = parse_document(&raw)?.into_conversation(id)?;
            if conversation.is_owner(owner_id) {
                conversations.push(conversation);
            }
        }

        conversations.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(conversations)
    }

    async fn insert(&self, conversation: NewConversation) -> Result<Conversation, RepositoryError> {
        let mut conn = self.conn.clone();

        let mut id = ConversationId::from_uuid(Uuid::new_v4());
        loop {
            let taken: bool = conn
                .exists(self.document_key(&id))
                .await
                .map_err(|e| redis_error("check conversation id", e))?;
            if !taken {
                break;
            }
            id = ConversationId::from_uuid(Uuid::new_v4());
        }

        let owner_id = conversation.owner_id().clone();
        let document =
            ConversationDocument::from_conversation(&conversation.into_conversation(id.clone()));

        redis::pipe()
            .atomic()
            .set(self.document_key(&id), serialize_document(&document)?)
            .ignore()
            .zadd(self.owner_index_key(&owner_id), id.as_str(), document.created_at)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| redis_error("insert conversation", e))?;

        // Return what a later read will see, at millisecond precision.
        document.into_conversation(id)
    }

    async fn replace(
        &self,
        id: &ConversationId,
        owner_id: &UserId,
        changes: ConversationChanges,
    ) -> Result<Conversation, RepositoryError> {
        let mut conversation = self.load_document(owner_id, id).await?;
        conversation.apply_changes(changes);

        let document = ConversationDocument::from_conversation(&conversation);
        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(self.document_key(id), serialize_document(&document)?)
            .await
            .map_err(|e| redis_error("update conversation", e))?;

        document.into_conversation(id.clone())
    }

    async fn remove(&self, id: &ConversationId, owner_id: &UserId) -> Result<(), RepositoryError> {
        self.load_document(owner_id, id).await?;

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .del(self.document_key(id))
            .ignore()
            .zrem(self.owner_index_key(owner_id), id.as_str())
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| redis_error("delete conversation", e))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| redis_error("ping", e))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisConversationRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConversationRepository")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════════

fn redis_error(operation: &str, e: redis::RedisError) -> RepositoryError {
    RepositoryError::Backend(format!("Failed to {}: {}", operation, e))
}

fn parse_document(raw: &str) -> Result<ConversationDocument, RepositoryError> {
    serde_json::from_str(raw).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn serialize_document(document: &ConversationDocument) -> Result<String, RepositoryError> {
    serde_json::to_string(document).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn millis_to_timestamp(millis: i64) -> Result<Timestamp, RepositoryError> {
    Timestamp::from_unix_millis(millis)
        .ok_or_else(|| RepositoryError::Serialization(format!("Invalid timestamp: {}", millis)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::MessageDraft;
    use crate::domain::foundation::MessageId;
    use serde_json::json;

    fn sample_conversation() -> Conversation {
        let new = NewConversation::new(
            UserId::new("user-1").unwrap(),
            Some("Trip".into()),
            Some("Summer".into()),
        )
        .unwrap();
        let mut conversation = new.into_conversation(ConversationId::new("c1"));
        let message = MessageDraft::new(Some("hi".into()), Some("user".into()), None)
            .unwrap()
            .into_message(MessageId::new("m1"), Timestamp::now());
        conversation.apply_changes(
            ConversationChanges::touch(Timestamp::now_not_before(conversation.updated_at()))
                .with_messages(vec![message]),
        );
        conversation
    }

    #[test]
    fn document_uses_camel_case_and_epoch_millis() {
        let conversation = sample_conversation();
        let value =
            serde_json::to_value(ConversationDocument::from_conversation(&conversation)).unwrap();

        assert_eq!(value["userId"], json!("user-1"));
        assert_eq!(value["createdAt"], json!(conversation.created_at().as_unix_millis()));
        assert!(value["updatedAt"].is_i64());
        assert_eq!(value["messages"][0]["id"], json!("m1"));
    }

    #[test]
    fn document_converts_back_at_millisecond_precision() {
        let conversation = sample_conversation();
        let document = ConversationDocument::from_conversation(&conversation);

        let restored = document.into_conversation(ConversationId::new("c1")).unwrap();

        assert_eq!(restored.title(), "Trip");
        assert_eq!(restored.description(), Some("Summer"));
        assert_eq!(restored.messages(), conversation.messages());
        assert_eq!(
            restored.created_at().as_unix_millis(),
            conversation.created_at().as_unix_millis()
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw = r#"{"userId":"u","title":"T","createdAt":0,"updatedAt":0}"#;

        let document = parse_document(raw).unwrap();

        assert_eq!(document.description, None);
        assert!(document.messages.is_empty());
    }

    #[test]
    fn corrupt_document_is_serialization_error() {
        assert!(matches!(
            parse_document("{not json"),
            Err(RepositoryError::Serialization(_))
        ));
    }

    async fn live_repository() -> RedisConversationRepository {
        let url = std::env::var("TEST_REDIS_URL").expect("TEST_REDIS_URL must be set");
        let client = redis::Client::open(url).expect("valid redis url");
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .expect("connect to test redis");
        RedisConversationRepository::new(conn, format!("test-{}:", Uuid::new_v4()))
    }

    #[tokio::test]
    #[ignore = "requires TEST_REDIS_URL"]
    async fn lists_newest_first_and_removes_from_index() {
        let repo = live_repository().await;
        let owner = UserId::new("user-1").unwrap();

        assert!(repo.find_all(&owner).await.unwrap().is_empty());

        let first = repo
            .insert(NewConversation::new(owner.clone(), Some("first".into()), None).unwrap())
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo
            .insert(NewConversation::new(owner.clone(), Some("second".into()), None).unwrap())
            .await
            .unwrap();

        let listed = repo.find_all(&owner).await.unwrap();
        assert_eq!(listed.iter().map(|c| c.id()).collect::<Vec<_>>(), vec![second.id(), first.id()]);

        repo.remove(first.id(), &owner).await.unwrap();
        repo.remove(second.id(), &owner).await.unwrap();
        assert!(repo.find_all(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires TEST_REDIS_URL"]
    async fn foreign_owner_is_not_found() {
        let repo = live_repository().await;
        let owner = UserId::new("user-1").unwrap();
        let stranger = UserId::new("user-2").unwrap();
        let created = repo
            .insert(NewConversation::new(owner.clone(), Some("Trip".into()), None).unwrap())
            .await
            .unwrap();

        assert!(matches!(
            repo.find(&stranger, created.id()).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.remove(created.id(), &stranger).await,
            Err(RepositoryError::NotFound(_))
        ));

        repo.remove(created.id(), &owner).await.unwrap();
    }
}
