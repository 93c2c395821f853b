//! Redis adapters - document-store persistence.

mod conversation_repository;

pub use conversation_repository::RedisConversationRepository;
