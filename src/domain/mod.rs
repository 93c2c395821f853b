//! Domain layer - Core business logic.
//!
//! Pure types with no infrastructure dependencies:
//! - `foundation` - identifiers, timestamps, error codes, auth types
//! - `conversation` - conversation aggregate and message sequence logic

pub mod conversation;
pub mod foundation;
