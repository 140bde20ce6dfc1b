use crate::config::AdminConfig;
use crate::services::LaptopService;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::SqlitePool;
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub laptops: Arc<LaptopService>,
    pub admin: Arc<AdminConfig>,
}

impl AppState {
    pub fn build(pool: SqlitePool, admin: AdminConfig) -> Self {
        Self {
            laptops: Arc::new(LaptopService::new(pool)),
            admin: Arc::new(admin),
        }
    }
}

impl FromRequestParts<AppState> for Arc<LaptopService> {
    type Rejection = Infallible;
    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.laptops.clone())
    }
}
