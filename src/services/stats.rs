use crate::errors::ApiResult;
use crate::models::dtos::laptop::StatsDto;
use crate::services::LaptopService;
use axum::Json;
use std::sync::Arc;

pub async fn stats(laptops: Arc<LaptopService>) -> ApiResult<Json<StatsDto>> {
    let stats = laptops.stats().await?;
    Ok(Json(stats))
}
