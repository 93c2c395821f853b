//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the conversation store.

mod auth;
mod errors;
mod ids;
mod ownership;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{ErrorCode, ValidationError};
pub use ids::{ConversationId, MessageId, UserId};
pub use ownership::OwnedByUser;
pub use timestamp::Timestamp;
