//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_provider: String,
    pub llm_model: String,
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<Health>> {
    Json(ApiResponse::success(
        Health {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            llm_provider: state.provider_name.clone(),
            llm_model: state.config.llm.model.clone(),
        },
        Uuid::now_v7().to_string(),
        0,
    ))
}
