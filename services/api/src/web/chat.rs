//! services/api/src/web/chat.rs
//!
//! The journal chat companion. A turn always answers 200: upstream and
//! storage failures degrade to canned replies instead of errors.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use mindmatters_core::domain::ChatMessage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    adapters::chat::TECHNICAL_ISSUE_REPLY,
    error::{ApiError, ErrorBody},
    web::{
        extract::AppJson,
        state::{AppState, AuthUser},
    },
};

const HISTORY_LIMIT: i64 = 50;

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(chat: ChatMessage) -> Self {
        Self {
            id: chat.id,
            user_id: chat.user_id,
            message: chat.message,
            response: chat.response,
            timestamp: chat.timestamp,
        }
    }
}

/// Send one message to the chat companion.
#[utoipa::path(
    post,
    path = "/api/journal/chat",
    tag = "chat",
    security(("bearer" = [])),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The companion's reply", body = ChatResponse),
        (status = 400, description = "Empty message", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::Validation("Message is required".to_string()))?;

    let reply = state.chat.reply(message).await;

    let response = match state
        .db
        .save_chat_message(Some(auth.id), message, &reply)
        .await
    {
        Ok(_) => reply,
        Err(e) => {
            error!("Failed to save chat message for user {}: {}", auth.id, e);
            TECHNICAL_ISSUE_REPLY.to_string()
        }
    };

    Ok(Json(ChatResponse { response }))
}

/// The caller's last 50 chat exchanges, newest first.
#[utoipa::path(
    get,
    path = "/api/journal/chat/history",
    tag = "chat",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Chat history", body = [ChatMessageResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn chat_history_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let history = state.db.chat_history(auth.id, HISTORY_LIMIT).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
