use crate::models::ConflictReport;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// One or more identity fields are already registered.
    Conflict(ConflictReport),
    ResourceNotFound,
    InvalidEmail,
    InvalidPassword,
    Internal(anyhow::Error),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Conflict(report) => {
                let messages = report.messages().collect::<Vec<_>>();
                write!(f, "Duplicate registration: {}", messages.join("; "))
            }
            ApiError::ResourceNotFound => f.write_str("The requested resource could not be found."),
            ApiError::InvalidEmail => f.write_str("Invalid email"),
            ApiError::InvalidPassword => f.write_str("Invalid password"),
            ApiError::Internal(_) => {
                f.write_str("An internal error occurred. Please try again later.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!("{}", message);
        match self {
            // Field-level map so the caller can attach each message to the
            // offending form field.
            ApiError::Conflict(report) => {
                (StatusCode::BAD_REQUEST, Json(report)).into_response()
            }
            ApiError::InvalidEmail | ApiError::InvalidPassword => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::ResourceNotFound => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::Internal(err) => {
                err.chain()
                    .skip(1)
                    .for_each(|cause| tracing::error!("Because: {}", cause));
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(value: E) -> Self {
        Self::Internal(value.into())
    }
}
