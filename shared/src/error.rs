use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error taxonomy shared by every service. Status codes are assigned
/// here and nowhere else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing required field, malformed payload, or a foreign key the
    /// owning service reports as absent.
    #[error("{0}")]
    Validation(String),

    /// Direct lookup miss on an entity this service owns.
    #[error("{0}")]
    NotFound(String),

    /// Booking contention or insufficient stock.
    #[error("{0}")]
    Conflict(String),

    /// A peer service was unreachable while validating a reference.
    /// The write fails closed; the peer's silence never means "valid".
    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {:#}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
