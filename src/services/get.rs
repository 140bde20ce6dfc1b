use crate::errors::{ApiError, ApiResult};
use crate::models::LaptopEntity;
use crate::services::LaptopService;
use axum::Json;
use axum::extract::Path;
use std::sync::Arc;
use uuid::Uuid;

pub async fn get(
    laptops: Arc<LaptopService>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LaptopEntity>> {
    let entity = laptops.get(&id).await?.ok_or(ApiError::ResourceNotFound)?;
    Ok(Json(entity))
}
