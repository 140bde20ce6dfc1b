use crate::errors::ApiResult;
use crate::models::LaptopEntity;
use crate::models::dtos::laptop::LaptopSubmissionDto;
use crate::services::LaptopService;
use axum::Json;
use axum::extract::Path;
use std::sync::Arc;
use uuid::Uuid;

pub async fn update(
    laptops: Arc<LaptopService>,
    Path(id): Path<Uuid>,
    Json(fields): Json<LaptopSubmissionDto>,
) -> ApiResult<Json<LaptopEntity>> {
    let entity = laptops.update(&id, fields).await?;
    tracing::info!(id = %entity.id, "laptop updated");
    Ok(Json(entity))
}
