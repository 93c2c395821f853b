//! Conversation aggregate.
//!
//! A conversation belongs to exactly one owner and embeds its messages as an
//! ordered list. Backends assign the id on insert; everything else is
//! decided by the store before it reaches a backend.
//!
//! # Invariants
//!
//! - `owner_id` never changes
//! - `title` is non-empty
//! - `messages` keep insertion order
//! - `updated_at >= created_at`

use crate::domain::foundation::{
    ConversationId, MessageId, OwnedByUser, Timestamp, UserId, ValidationError,
};

use super::message::Message;

/// A persisted conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: ConversationId,
    owner_id: UserId,
    title: String,
    description: Option<String>,
    messages: Vec<Message>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Reconstitute a conversation from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ConversationId,
        owner_id: UserId,
        title: String,
        description: Option<String>,
        messages: Vec<Message>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            description,
            messages,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Messages in chronological (insertion) order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Looks up a message by id.
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a partial update. Fields left as `None` are untouched.
    ///
    /// Used by backends that rewrite a whole document; relational backends
    /// apply the same semantics in SQL.
    pub fn apply_changes(&mut self, changes: ConversationChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(messages) = changes.messages {
            self.messages = messages;
        }
        self.updated_at = changes.updated_at;
    }
}

impl OwnedByUser for Conversation {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

/// A validated conversation that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConversation {
    owner_id: UserId,
    title: String,
    description: Option<String>,
    created_at: Timestamp,
}

impl NewConversation {
    /// Validates creation input.
    ///
    /// # Errors
    ///
    /// - `MissingField` / `EmptyField` if the title is absent or blank
    pub fn new(
        owner_id: UserId,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            owner_id,
            title: validate_title(title)?,
            description,
            created_at: Timestamp::now(),
        })
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Creation instant; also the initial `updated_at`.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Builds the stored conversation once the backend has chosen an id.
    pub fn into_conversation(self, id: ConversationId) -> Conversation {
        Conversation {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            messages: Vec::new(),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial set of fields to write back to an existing conversation.
///
/// `description` is doubly optional: `None` leaves it alone, `Some(None)`
/// clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub messages: Option<Vec<Message>>,
    pub updated_at: Timestamp,
}

impl ConversationChanges {
    /// Changes that only refresh `updated_at`.
    pub fn touch(updated_at: Timestamp) -> Self {
        Self {
            title: None,
            description: None,
            messages: None,
            updated_at,
        }
    }

    pub fn with_title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }
}

/// Checks that a title is present and not blank.
pub fn validate_title(title: Option<String>) -> Result<String, ValidationError> {
    let title = title.ok_or_else(|| ValidationError::missing_field("title"))?;
    if title.trim().is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    Ok(title)
}
