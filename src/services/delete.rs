use crate::errors::ApiResult;
use crate::services::LaptopService;
use axum::extract::Path;
use std::sync::Arc;
use uuid::Uuid;

pub async fn delete(laptops: Arc<LaptopService>, Path(id): Path<Uuid>) -> ApiResult<()> {
    laptops.delete(&id).await?;
    tracing::info!(%id, "laptop deleted");
    Ok(())
}
