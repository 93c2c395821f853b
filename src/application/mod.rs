//! Application layer - orchestrates domain logic over the ports.
//!
//! The `ConversationStore` façade validates input, enforces ownership, and
//! serializes writes per conversation before delegating to the active
//! repository adapter.

pub mod conversation;

pub use conversation::{
    AppendMessageCommand, AppendMessageResult, ConversationLocks, ConversationStore,
    CreateConversationCommand, UpdateConversationCommand,
};
