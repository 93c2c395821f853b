//! HTTP integration tests for the conversation API.
//!
//! Drives the full application router (auth middleware, handlers, in-memory
//! storage) with `tower::ServiceExt::oneshot` and verifies:
//! 1. Status codes and `{code, message}` error bodies
//! 2. Response envelopes for conversations and messages
//! 3. Per-user isolation through bearer tokens
//! 4. Explicit `null` clearing the description

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use conversation_store::adapters::auth::MockSessionValidator;
use conversation_store::adapters::http::app_router;
use conversation_store::adapters::InMemoryConversationRepository;
use conversation_store::application::ConversationStore;
use conversation_store::config::ServerConfig;

// =============================================================================
// Test Infrastructure
// =============================================================================

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";

fn app() -> Router {
    let store = ConversationStore::new(Arc::new(InMemoryConversationRepository::new()));
    let validator = MockSessionValidator::new()
        .with_test_user(ALICE, "alice")
        .with_test_user(BOB, "bob");
    app_router(store, Arc::new(validator), &ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = send(app, Method::POST, "/api/conversations", token, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["conversation"].clone()
}

fn id_of(conversation: &Value) -> String {
    conversation["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn missing_token_is_unauthenticated() {
    let app = app();
    let request = Request::builder()
        .uri("/api/conversations")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/conversations", "forged", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Conversations
// =============================================================================

#[tokio::test]
async fn create_returns_201_with_envelope() {
    let app = app();

    let conversation = create(
        &app,
        ALICE,
        json!({"title": "Trip planning", "description": "Summer"}),
    )
    .await;

    assert_eq!(conversation["title"], json!("Trip planning"));
    assert_eq!(conversation["description"], json!("Summer"));
    assert_eq!(conversation["owner_id"], json!("alice"));
    assert_eq!(conversation["messages"], json!([]));
    assert_eq!(conversation["created_at"], conversation["updated_at"]);
}

#[tokio::test]
async fn create_without_title_is_400() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/conversations",
        ALICE,
        Some(json!({"description": "no title"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_FAILED"));

    let (_, list) = send(&app, Method::GET, "/api/conversations", ALICE, None).await;
    assert_eq!(list["conversations"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/conversations")
        .header(header::AUTHORIZATION, format!("Bearer {}", ALICE))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], json!("VALIDATION_FAILED"));
}

#[tokio::test]
async fn list_only_shows_own_conversations() {
    let app = app();
    create(&app, ALICE, json!({"title": "Alice's"})).await;
    create(&app, BOB, json!({"title": "Bob's"})).await;

    let (status, body) = send(&app, Method::GET, "/api/conversations", ALICE, None).await;

    assert_eq!(status, StatusCode::OK);
    let conversations = body["conversations"].as_array().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["title"], json!("Alice's"));
}

#[tokio::test]
async fn another_users_conversation_is_404() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Private"})).await);
    let uri = format!("/api/conversations/{}", id);

    let (status, body) = send(&app, Method::GET, &uri, BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("CONVERSATION_NOT_FOUND"));

    let (status, _) = send(&app, Method::DELETE, &uri, BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &uri, ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_title_keeps_description() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Trip", "description": "Summer"})).await);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/conversations/{}", id),
        ALICE,
        Some(json!({"title": "Paris"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation"]["title"], json!("Paris"));
    assert_eq!(body["conversation"]["description"], json!("Summer"));
}

#[tokio::test]
async fn null_description_clears_it() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Trip", "description": "Summer"})).await);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/conversations/{}", id),
        ALICE,
        Some(json!({"description": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation"]["title"], json!("Trip"));
    assert_eq!(body["conversation"]["description"], Value::Null);
}

#[tokio::test]
async fn update_with_empty_title_is_400() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Trip"})).await);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/conversations/{}", id),
        ALICE,
        Some(json!({"title": "  "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_FAILED"));
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Short-lived"})).await);
    let uri = format!("/api/conversations/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, _) = send(&app, Method::GET, &uri, ALICE, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Messages
// =============================================================================

#[tokio::test]
async fn append_and_remove_messages() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Trip planning"})).await);
    let messages_uri = format!("/api/conversations/{}/messages", id);

    let (status, first) = send(
        &app,
        Method::POST,
        &messages_uri,
        ALICE,
        Some(json!({"content": "Where to?", "role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"]["content"], json!("Where to?"));
    assert_eq!(first["message"]["role"], json!("user"));
    assert_eq!(first["conversation"]["messages"].as_array().unwrap().len(), 1);

    let (_, second) = send(
        &app,
        Method::POST,
        &messages_uri,
        ALICE,
        Some(json!({"content": "Paris!", "role": "assistant", "metadata": {"model": "x"}})),
    )
    .await;
    assert_eq!(second["message"]["metadata"], json!({"model": "x"}));
    let messages = second["conversation"]["messages"].as_array().unwrap();
    assert_eq!(messages[0]["content"], json!("Where to?"));
    assert_eq!(messages[1]["content"], json!("Paris!"));

    let first_id = first["message"]["id"].as_str().unwrap();
    let (status, removed) = send(
        &app,
        Method::DELETE,
        &format!("{}/{}", messages_uri, first_id),
        ALICE,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["success"], json!(true));
    let remaining = removed["conversation"]["messages"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["content"], json!("Paris!"));
}

#[tokio::test]
async fn append_without_role_is_400() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Trip"})).await);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/conversations/{}/messages", id),
        ALICE,
        Some(json!({"content": "hello"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("VALIDATION_FAILED"));
}

#[tokio::test]
async fn removing_unknown_message_is_message_not_found() {
    let app = app();
    let id = id_of(&create(&app, ALICE, json!({"title": "Trip"})).await);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/conversations/{}/messages/nope", id),
        ALICE,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("MESSAGE_NOT_FOUND"));
}

#[tokio::test]
async fn appending_to_unknown_conversation_is_404() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/conversations/missing/messages",
        ALICE,
        Some(json!({"content": "hi", "role": "user"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("CONVERSATION_NOT_FOUND"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn readiness_reports_ok_for_memory_backend() {
    let app = app();
    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
