use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::auth::{LoginRequest, RegisterRequest};
use crate::models::api::ApiResponse;
use crate::AppState;

/// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.auth_service.register(&request) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok_empty())),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.auth_service.login(&request) {
        Ok(response) => (StatusCode::OK, Json(ApiResponse::ok(response))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .with_state(state)
}
