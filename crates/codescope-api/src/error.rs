use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use codescope_core::CodeScopeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    CodeScope(#[from] CodeScopeError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            ApiError::CodeScope(err) => match err {
                CodeScopeError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
                CodeScopeError::AnalysisProvider {
                    status,
                    message,
                    details,
                } => (
                    provider_status(status),
                    format!("Analysis provider error: {message}"),
                    details,
                ),
                CodeScopeError::AnalysisParse { message, raw_text } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to parse analysis response: {message}"),
                    Some(raw_text),
                ),
                CodeScopeError::VideoProvider {
                    status,
                    message,
                    details,
                } => (
                    provider_status(status),
                    format!("Video provider error: {message}"),
                    details,
                ),
                other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string(), None),
            },
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16(),
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

// Mirror the upstream status when it maps to a valid HTTP code, 500 otherwise.
fn provider_status(status: Option<u16>) -> StatusCode {
    status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub type ApiResult<T> = Result<T, ApiError>;
