//! PostgreSQL implementation of ConversationRepository.
//!
//! One row per conversation; the message list lives in a JSONB column and
//! is rewritten whole on every change. Ids are UUIDs chosen by the database.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Conversation, ConversationChanges, Message, NewConversation};
use crate::domain::foundation::{ConversationId, Timestamp, UserId};
use crate::ports::{ConversationRepository, RepositoryError};

const SELECT_COLUMNS: &str =
    "id, user_id, title, description, messages, created_at, updated_at";

/// PostgreSQL implementation of ConversationRepository.
#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    /// Creates a new PostgresConversationRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn find(
        &self,
        owner_id: &UserId,
        id: &ConversationId,
    ) -> Result<Conversation, RepositoryError> {
        // A non-UUID id cannot name any row.
        let uuid = id.to_uuid().ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM conversations WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        ))
        .bind(uuid)
        .bind(owner_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch conversation", e))?;

        match row {
            Some(row) => row_to_conversation(&row),
            None => Err(RepositoryError::NotFound(id.clone())),
        }
    }

    async fn find_all(&self, owner_id: &UserId) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM conversations WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list conversations", e))?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn insert(&self, conversation: NewConversation) -> Result<Conversation, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO conversations (
                user_id, title, description, messages, created_at, updated_at
            ) VALUES ($1, $2, $3, '[]'::jsonb, $4, $4)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(conversation.owner_id().as_str())
        .bind(conversation.title())
        .bind(conversation.description())
        .bind(conversation.created_at().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("insert conversation", e))?;

        row_to_conversation(&row)
    }

    async fn replace(
        &self,
        id: &ConversationId,
        owner_id: &UserId,
        changes: ConversationChanges,
    ) -> Result<Conversation, RepositoryError> {
        let uuid = id.to_uuid().ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let (set_description, description) = match changes.description {
            Some(description) => (true, description),
            None => (false, None),
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE conversations SET
                title = COALESCE($3, title),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                messages = COALESCE($6, messages),
                updated_at = $7
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(uuid)
        .bind(owner_id.as_str())
        .bind(changes.title)
        .bind(set_description)
        .bind(description)
        .bind(changes.messages.map(Json))
        .bind(changes.updated_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("update conversation", e))?;

        match row {
            Some(row) => row_to_conversation(&row),
            None => Err(RepositoryError::NotFound(id.clone())),
        }
    }

    async fn remove(&self, id: &ConversationId, owner_id: &UserId) -> Result<(), RepositoryError> {
        let uuid = id.to_uuid().ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let result = sqlx::query("DELETE FROM conversations WHERE id = $1 AND user_id = $2")
            .bind(uuid)
            .bind(owner_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete conversation", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.clone()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("ping", e))?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════════

fn database_error(operation: &str, e: sqlx::Error) -> RepositoryError {
    RepositoryError::Backend(format!("Failed to {}: {}", operation, e))
}

fn row_to_conversation(row: &PgRow) -> Result<Conversation, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Serialization(e.to_string());

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let user_id: String = row.try_get("user_id").map_err(decode)?;
    let title: String = row.try_get("title").map_err(decode)?;
    let description: Option<String> = row.try_get("description").map_err(decode)?;
    let Json(messages): Json<Vec<Message>> = row.try_get("messages").map_err(decode)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(decode)?;

    let owner_id =
        UserId::new(user_id).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

    Ok(Conversation::reconstitute(
        ConversationId::from_uuid(id),
        owner_id,
        title,
        description,
        messages,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
