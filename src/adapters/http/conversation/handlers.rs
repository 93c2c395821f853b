//! HTTP handlers for conversation endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::ConversationStore;
use crate::domain::conversation::ConversationError;
use crate::domain::foundation::{ConversationId, MessageId};

use super::dto::{
    AppendMessageRequest, AppendMessageResponse, ConversationEnvelope, ConversationListResponse,
    ConversationResponse, CreateConversationRequest, RemoveMessageResponse,
    SuccessResponse, UpdateConversationRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/conversations - List the caller's conversations
pub async fn list_conversations(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match store.list(&user.id).await {
        Ok(conversations) => {
            let response = ConversationListResponse {
                conversations: conversations.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_conversation_error("list conversations", e),
    }
}

/// GET /api/conversations/:id - Get one conversation
pub async fn get_conversation(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = ConversationId::new(id);

    match store.get(&user.id, &id).await {
        Ok(conversation) => envelope(StatusCode::OK, conversation.into()),
        Err(e) => handle_conversation_error("get conversation", e),
    }
}

/// POST /api/conversations - Create a conversation
pub async fn create_conversation(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<CreateConversationRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_json_rejection(rejection),
    };

    match store.create(&user.id, req.into()).await {
        Ok(conversation) => envelope(StatusCode::CREATED, conversation.into()),
        Err(e) => handle_conversation_error("create conversation", e),
    }
}

/// PUT /api/conversations/:id - Update title and/or description
pub async fn update_conversation(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    body: Result<Json<UpdateConversationRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_json_rejection(rejection),
    };
    let id = ConversationId::new(id);

    match store.update(&user.id, &id, req.into()).await {
        Ok(conversation) => envelope(StatusCode::OK, conversation.into()),
        Err(e) => handle_conversation_error("update conversation", e),
    }
}

/// DELETE /api/conversations/:id - Delete a conversation and its messages
pub async fn delete_conversation(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = ConversationId::new(id);

    match store.delete(&user.id, &id).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Err(e) => handle_conversation_error("delete conversation", e),
    }
}

/// POST /api/conversations/:id/messages - Append a message
pub async fn append_message(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    body: Result<Json<AppendMessageRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_json_rejection(rejection),
    };
    let id = ConversationId::new(id);

    match store.append_message(&user.id, &id, req.into()).await {
        Ok(result) => {
            let response = AppendMessageResponse {
                message: result.message,
                conversation: result.conversation.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_conversation_error("append message", e),
    }
}

/// DELETE /api/conversations/:id/messages/:message_id - Remove one message
pub async fn remove_message(
    State(store): State<ConversationStore>,
    RequireAuth(user): RequireAuth,
    Path((id, message_id)): Path<(String, String)>,
) -> Response {
    let id = ConversationId::new(id);
    let message_id = MessageId::new(message_id);

    match store.remove_message(&user.id, &id, &message_id).await {
        Ok(conversation) => {
            let response = RemoveMessageResponse {
                success: true,
                conversation: conversation.into(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_conversation_error("remove message", e),
    }
}

fn envelope(status: StatusCode, conversation: ConversationResponse) -> Response {
    (status, Json(ConversationEnvelope { conversation })).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_conversation_error(operation: &str, error: ConversationError) -> Response {
    let code = error.code();
    match error {
        ConversationError::ValidationFailed { message, .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(code, message)),
        )
            .into_response(),
        ConversationError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(code, "Conversation not found")),
        )
            .into_response(),
        ConversationError::MessageNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(code, "Message not found")),
        )
            .into_response(),
        ConversationError::Backend(msg) => {
            tracing::error!(operation, error = %msg, "Conversation backend failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response()
        }
    }
}

fn handle_json_rejection(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "Rejected request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    )
        .into_response()
}
