use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::logging::get_log_file_path;
use crate::service::ServiceError;

/// Trait for mapping domain errors to structured error codes and tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&'static str, Option<String>);
}

impl ToStructuredError for ServiceError {
    fn error_code_and_tip(&self) -> (&'static str, Option<String>) {
        match self {
            Self::Unauthorized => (
                "UNAUTHORIZED",
                Some("Sign in via POST /api/auth/session first".to_string()),
            ),
            Self::Validation(_) => ("VALIDATION_ERROR", None),
            Self::NotFound(_) => ("NOT_FOUND", None),
            Self::Storage(_) => {
                let logs = get_log_file_path();
                let tip = if logs.is_empty() {
                    None
                } else {
                    Some(format!("See logs at {logs}"))
                };
                ("STORAGE_ERROR", tip)
            }
        }
    }
}

/// JSON error body returned by every handler.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tip: Option<String>,
}

/// HTTP wrapper around [`ServiceError`].
///
/// Status mapping: `Unauthorized` 401, `Validation` 400, `NotFound` 404,
/// `Storage` 500.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

/// Shorthand for handler-level validation failures.
pub fn validation(message: impl Into<String>) -> ApiError {
    ApiError(ServiceError::Validation(message.into()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
        }
        let (code, tip) = self.0.error_code_and_tip();
        let body = ErrorBody {
            error: self.0.to_string(),
            code: code.to_string(),
            tip,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ServiceError::Unauthorized.error_code_and_tip().0,
            "UNAUTHORIZED"
        );
        assert_eq!(
            ServiceError::Validation("x".to_string())
                .error_code_and_tip()
                .0,
            "VALIDATION_ERROR"
        );
        assert_eq!(
            ServiceError::NotFound("x".to_string()).error_code_and_tip().0,
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_unauthorized_carries_a_tip() {
        let (_, tip) = ServiceError::Unauthorized.error_code_and_tip();
        assert!(tip.is_some());
    }

    #[test]
    fn test_error_body_skips_missing_tip() {
        let body = ErrorBody {
            error: "boom".to_string(),
            code: "VALIDATION_ERROR".to_string(),
            tip: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("tip"));
    }
}
