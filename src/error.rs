//! Request-level error taxonomy and the raw-backend-error classifier.

use axum::Json;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::Provider;
use crate::models::ErrorBody;

/// Response header carrying the machine-readable error kind.
pub const ERROR_TYPE_HEADER: &str = "x-error-type";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller sent empty or whitespace-only chapter content.
    #[error("章节内容不能为空")]
    EmptyContent,

    /// The configured provider selector matches no supported backend.
    #[error("不支持的 API 提供商: {0}")]
    UnsupportedProvider(String),

    /// The backend account is out of credit. Operator-actionable.
    #[error("{provider} API 服务余额不足，请联系管理员充值")]
    InsufficientBalance { provider: Provider },

    /// Any other backend or network fault, surfaced verbatim.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyContent => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedProvider(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable discriminant for programmatic clients.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::EmptyContent => "EMPTY_CONTENT",
            ApiError::UnsupportedProvider(_) => "UNSUPPORTED_PROVIDER",
            ApiError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            ApiError::Upstream(_) => "AI_SERVICE_ERROR",
        }
    }
}

/// Map a raw backend failure onto the taxonomy. Case-sensitive substring
/// matching against the active provider's balance markers; everything else
/// passes through verbatim as a generic upstream failure.
pub fn classify(provider: Provider, raw: String) -> ApiError {
    if provider
        .balance_markers()
        .iter()
        .any(|marker| raw.contains(marker))
    {
        ApiError::InsufficientBalance { provider }
    } else {
        ApiError::Upstream(raw)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_type = self.error_type();
        let body = ErrorBody {
            detail: self.to_string(),
            error_type: error_type.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            HeaderName::from_static(ERROR_TYPE_HEADER),
            HeaderValue::from_static(error_type),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_marker_classifies_as_insufficient_balance() {
        let err = classify(
            Provider::DeepSeek,
            "Error code: 402 - Insufficient Balance".to_string(),
        );
        assert!(matches!(err, ApiError::InsufficientBalance { .. }));
        assert_eq!(err.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(err.error_type(), "INSUFFICIENT_BALANCE");
    }

    #[test]
    fn marker_is_found_regardless_of_surrounding_text() {
        let raw = "{\"error\":{\"message\":\"Insufficient Balance\",\"code\":\"invalid_request_error\"}}";
        let err = classify(Provider::SiliconFlow, raw.to_string());
        assert!(matches!(
            err,
            ApiError::InsufficientBalance {
                provider: Provider::SiliconFlow
            }
        ));
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let err = classify(Provider::DeepSeek, "insufficient balance".to_string());
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[test]
    fn other_errors_pass_through_verbatim() {
        let raw = "connection reset by peer";
        let err = classify(Provider::DeepSeek, raw.to_string());
        match &err {
            ApiError::Upstream(message) => assert_eq!(message, raw),
            other => panic!("expected Upstream, got {other:?}"),
        }
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "AI_SERVICE_ERROR");
    }

    #[test]
    fn balance_message_names_the_provider() {
        let err = ApiError::InsufficientBalance {
            provider: Provider::DeepSeek,
        };
        assert!(err.to_string().contains("deepseek"));
        assert!(err.to_string().contains("余额不足"));
    }

    #[test]
    fn validation_error_is_a_bad_request() {
        assert_eq!(ApiError::EmptyContent.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyContent.error_type(), "EMPTY_CONTENT");
    }
}
