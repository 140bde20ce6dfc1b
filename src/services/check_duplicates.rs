use crate::errors::ApiResult;
use crate::models::dtos::laptop::{DuplicateProbeDto, LaptopSubmissionDto};
use crate::services::LaptopService;
use axum::Json;
use std::sync::Arc;

pub async fn check_duplicates(
    laptops: Arc<LaptopService>,
    Json(candidate): Json<LaptopSubmissionDto>,
) -> ApiResult<Json<DuplicateProbeDto>> {
    let probe = laptops.probe_duplicates(&candidate).await?;
    Ok(Json(probe))
}
