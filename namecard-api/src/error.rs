//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use namecard_core::error::NamecardError;
use namecard_core::types::ErrorBody;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error envelope, mirroring the success shape with `data` set to null.
#[derive(Serialize)]
struct ErrorResponse {
    data: Option<()>,
    error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            data: None,
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<NamecardError> for ApiError {
    fn from(err: NamecardError) -> Self {
        let status = match &err {
            NamecardError::UnknownProvider(_)
            | NamecardError::InvalidAddress(_)
            | NamecardError::ValidationError(_) => StatusCode::BAD_REQUEST,
            NamecardError::ChainQuery(_) | NamecardError::MissingResolver { .. } => {
                StatusCode::BAD_GATEWAY
            }
            NamecardError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => {
                tracing::error!(error = %err, "Internal error");
                return ApiError::internal("An internal error occurred");
            }
        };

        ApiError::new(status, err.to_string(), err.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (NamecardError::UnknownProvider("lens".into()), StatusCode::BAD_REQUEST),
            (NamecardError::InvalidAddress("0x1".into()), StatusCode::BAD_REQUEST),
            (NamecardError::ChainQuery("down".into()), StatusCode::BAD_GATEWAY),
            (
                NamecardError::MissingResolver { domain: "a.eth".into() },
                StatusCode::BAD_GATEWAY,
            ),
            (NamecardError::Timeout { millis: 10 }, StatusCode::GATEWAY_TIMEOUT),
            (NamecardError::ConfigError("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_code_and_message_preserved() {
        let err = ApiError::from(NamecardError::MissingResolver { domain: "a.eth".into() });
        assert_eq!(err.code, "MISSING_RESOLVER");
        assert_eq!(err.message, "Error finding resolver for a.eth.");

        let internal = ApiError::from(NamecardError::ConfigError("secret detail".into()));
        assert_eq!(internal.code, "INTERNAL_ERROR");
        assert!(!internal.message.contains("secret"));
    }
}
