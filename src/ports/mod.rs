//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationRepository` - storage backend capability set
//! - `SessionValidator` - bearer token validation

mod conversation_repository;
mod session_validator;

pub use conversation_repository::{ConversationRepository, RepositoryError};
pub use session_validator::SessionValidator;
