//! PostgreSQL adapters - relational-JSON persistence.
//!
//! - `PostgresConversationRepository` - one row per conversation, messages in JSONB

mod conversation_repository;

pub use conversation_repository::PostgresConversationRepository;
