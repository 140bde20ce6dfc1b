use crate::errors::ApiResult;
use crate::models::LaptopEntity;
use crate::services::LaptopService;
use axum::Json;
use std::sync::Arc;

pub async fn list(laptops: Arc<LaptopService>) -> ApiResult<Json<Vec<LaptopEntity>>> {
    let items = laptops.list().await?;
    tracing::info!(count = items.len(), "retrieved laptops");
    Ok(Json(items))
}
