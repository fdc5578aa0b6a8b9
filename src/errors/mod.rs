/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Upstream responded with status {status}")]
    Upstream { status: u16 },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "UPSTREAM_ERROR",
            ApiError::Upstream { status } => match *status {
                403 => "UPSTREAM_403",
                404 => "UPSTREAM_404",
                429 => "UPSTREAM_429",
                500..=599 => "UPSTREAM_5XX",
                _ => "UPSTREAM_ERROR",
            },
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        // Errors travel in the envelope, the status stays 200
        (StatusCode::OK, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_codes() {
        assert_eq!(ApiError::Upstream { status: 404 }.code(), "UPSTREAM_404");
        assert_eq!(ApiError::Upstream { status: 503 }.code(), "UPSTREAM_5XX");
        assert_eq!(ApiError::Upstream { status: 418 }.code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ApiError::InvalidInput("unknown filter 'maybe'".to_string());
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(err.to_string(), "Invalid input: unknown filter 'maybe'");
    }

    #[test]
    fn test_error_response_keeps_http_ok() {
        let response = ApiError::Upstream { status: 500 }.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
