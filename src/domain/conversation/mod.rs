//! Conversation module - the conversation aggregate and its message list.
//!
//! - `Conversation` / `NewConversation` / `ConversationChanges` - the record
//!   and the shapes used to create and partially update it
//! - `Message` / `MessageDraft` - embedded chat messages
//! - `sequence` - append/remove logic over the embedded list
//! - `ConversationError` - error taxonomy of store operations

#[allow(clippy::module_inception)]
mod conversation;
mod errors;
mod message;
pub mod sequence;

pub use conversation::{validate_title, Conversation, ConversationChanges, NewConversation};
pub use errors::ConversationError;
pub use message::{Message, MessageDraft, MessageMetadata};
