//! HTTP routes for conversation endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::application::ConversationStore;

use super::handlers::{
    append_message, create_conversation, delete_conversation, get_conversation,
    list_conversations, remove_message, update_conversation,
};

/// Creates the conversation router, to be nested under `/api/conversations`.
pub fn conversation_routes(store: ConversationStore) -> Router {
    Router::new()
        .route("/", get(list_conversations).post(create_conversation))
        .route(
            "/:id",
            get(get_conversation)
                .put(update_conversation)
                .delete(delete_conversation),
        )
        .route("/:id/messages", post(append_message))
        .route("/:id/messages/:message_id", delete(remove_message))
        .with_state(store)
}
