//! Conversation HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AppendMessageRequest, ConversationResponse, CreateConversationRequest,
    UpdateConversationRequest,
};
pub use routes::conversation_routes;
