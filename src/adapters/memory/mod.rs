//! In-memory adapters for development and tests.

mod conversation_repository;

pub use conversation_repository::InMemoryConversationRepository;
