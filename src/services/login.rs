use crate::errors::{ApiError, ApiResult};
use crate::models::dtos::auth::LoginDto;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

/// Flat equality against the configured admin credentials; no hashing and
/// no session. Email is checked before password.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginDto>,
) -> ApiResult<Json<Value>> {
    tracing::info!(email = %request.email, "login attempt");
    if state.admin.email != request.email {
        return Err(ApiError::InvalidEmail);
    }
    if state.admin.password != request.password {
        return Err(ApiError::InvalidPassword);
    }
    tracing::info!(email = %request.email, "admin login successful");
    Ok(Json(json!({ "message": "Admin login successful" })))
}
