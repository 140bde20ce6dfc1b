use crate::errors::ApiResult;
use crate::models::LaptopEntity;
use crate::models::dtos::laptop::SearchQueryDto;
use crate::services::LaptopService;
use axum::Json;
use axum::extract::Query;
use std::sync::Arc;

pub async fn search(
    laptops: Arc<LaptopService>,
    Query(params): Query<SearchQueryDto>,
) -> ApiResult<Json<Vec<LaptopEntity>>> {
    let items = laptops.search(params.query.as_deref()).await?;
    tracing::info!(count = items.len(), "search finished");
    Ok(Json(items))
}
