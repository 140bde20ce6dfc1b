use crate::errors::ApiResult;
use crate::models::LaptopEntity;
use crate::models::dtos::laptop::LaptopSubmissionDto;
use crate::services::LaptopService;
use axum::{Json, debug_handler};
use std::sync::Arc;

#[debug_handler(state = crate::state::AppState)]
pub async fn register(
    laptops: Arc<LaptopService>,
    Json(candidate): Json<LaptopSubmissionDto>,
) -> ApiResult<Json<LaptopEntity>> {
    tracing::info!(student = %candidate.student_name, "registering new laptop");
    let entity = laptops.register(candidate).await?;
    tracing::info!(id = %entity.id, "laptop registered");
    Ok(Json(entity))
}
