//! Conversation store - the single entry point for conversation operations.

mod commands;
mod locks;
mod store;

pub use commands::{AppendMessageCommand, CreateConversationCommand, UpdateConversationCommand};
pub use locks::ConversationLocks;
pub use store::{AppendMessageResult, ConversationStore};
