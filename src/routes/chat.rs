//! Chat history and relay routes.
//!
//! `POST /api/chat` delegates to the [`RelayEngine`]: upstream LLM failures
//! come back as assistant message content with HTTP 200, never as an HTTP
//! error, so the conversation log stays the single source of truth.
//!
//! [`RelayEngine`]: crate::relay::RelayEngine

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::entities::{ChatMessage, MessageStore};
use crate::error::ServerError;
use crate::schemas::chat::{MessageResponse, SendMessageRequest};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_history, send_message, clear_history),
    components(schemas(SendMessageRequest, MessageResponse))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(send_message))
        .route("/chat/history", get(get_history).delete(clear_history))
}

fn to_message_response(m: ChatMessage) -> MessageResponse {
    MessageResponse {
        id: m.id,
        role: m.role,
        content: m.content,
        created_at: m.created_at.to_rfc3339(),
    }
}

/// Full conversation history (`GET /api/chat/history`).
///
/// Ordered ascending by creation time, oldest first.
#[utoipa::path(
    get,
    path = "/api/chat/history",
    tag = "chat",
    responses(
        (status = 200, description = "Ordered message history", body = [MessageResponse]),
    )
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageResponse>>, ServerError> {
    let messages = state.store.list_messages().await?;
    Ok(Json(messages.into_iter().map(to_message_response).collect()))
}

/// Relay one user message (`POST /api/chat`).
///
/// Persists the user turn, calls the configured LLM endpoint, and returns
/// the persisted assistant turn.  Always 200 unless the input is invalid or
/// the store fails.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = MessageResponse),
        (status = 400, description = "Empty or invalid message"),
        (status = 500, description = "Persistence failure"),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    let reply = state.relay.relay(&req.message).await?;
    Ok(Json(to_message_response(reply)))
}

/// Clear the conversation history (`DELETE /api/chat/history`).
///
/// Irreversible.  Does not re-seed the welcome message; seeding happens only
/// at server startup.
#[utoipa::path(
    delete,
    path = "/api/chat/history",
    tag = "chat",
    responses(
        (status = 204, description = "History cleared"),
    )
)]
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ServerError> {
    state.store.clear_messages().await?;
    Ok(StatusCode::NO_CONTENT)
}
