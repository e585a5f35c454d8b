use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

const LOG_TARGET: &str = "server::error";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                debug!(target = LOG_TARGET, %message, "not found");
                (StatusCode::NOT_FOUND, message).into_response()
            }
        }
    }
}
