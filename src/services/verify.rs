use crate::errors::ApiResult;
use crate::models::LaptopEntity;
use crate::services::LaptopService;
use axum::Json;
use axum::extract::Path;
use std::sync::Arc;
use uuid::Uuid;

pub async fn verify(
    laptops: Arc<LaptopService>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LaptopEntity>> {
    let entity = laptops.verify(&id).await?;
    tracing::info!(id = %entity.id, "laptop verified");
    Ok(Json(entity))
}
