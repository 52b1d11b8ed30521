//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/messages                  - Run one message through the router
//! - GET    /api/v1/users/{user_id}/history   - Recent records, oldest first
//! - DELETE /api/v1/users/{user_id}/history   - Purge a user's history

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use switchboard_types::conversation::MessageRecord;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Largest history page a client may ask for.
const MAX_HISTORY_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub user_id: String,
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    20
}

fn require_user_id(user_id: &str) -> Result<&str, AppError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    Ok(trimmed)
}

/// POST /api/v1/messages - Route a message and return the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<SendMessageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let user_id = require_user_id(&body.user_id)?;

    let reply = state.router.handle_message(user_id, &body.text).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        SendMessageResponse {
            user_id: user_id.to_string(),
            reply,
        },
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/users/{user_id}/history - Recent records, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<MessageRecord>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();
    let user_id = require_user_id(&user_id)?;

    let limit = query.limit.min(MAX_HISTORY_LIMIT);
    let records = state.router.history(user_id, limit).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(records, request_id, elapsed)))
}

/// DELETE /api/v1/users/{user_id}/history - Purge history (204).
pub async fn delete_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = require_user_id(&user_id)?;
    let removed = state.router.forget(user_id).await?;
    tracing::info!(user_id, removed, "history purged via API");
    Ok(StatusCode::NO_CONTENT)
}
