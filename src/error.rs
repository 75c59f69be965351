use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::ErrorResponse;

/// Every failure a handler can report. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{upstream} request timed out after {timeout_ms} ms")]
    UpstreamTimeout {
        upstream: &'static str,
        timeout_ms: u64,
    },

    #[error("failed to reach {upstream}: {reason}")]
    UpstreamUnreachable {
        upstream: &'static str,
        reason: String,
    },

    #[error("{upstream} rejected the configured API key: invalid credentials")]
    InvalidProviderCredentials { upstream: &'static str },

    #[error("{upstream} request failed ({status}): {body}")]
    UpstreamStatus {
        upstream: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("invalid response from {upstream}: {reason}")]
    UpstreamProtocol {
        upstream: &'static str,
        reason: String,
    },

    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamUnreachable { .. } | Self::UpstreamProtocol { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::InvalidProviderCredentials { .. } => StatusCode::UNAUTHORIZED,
            Self::UpstreamStatus { status, .. }
                if status.is_client_error() || status.is_server_error() =>
            {
                *status
            }
            Self::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classifies a transport error. The URL is dropped because it carries the API key.
    pub(crate) fn from_transport(
        upstream: &'static str,
        timeout_ms: u64,
        err: reqwest::Error,
    ) -> Self {
        if err.is_timeout() {
            return Self::UpstreamTimeout {
                upstream,
                timeout_ms,
            };
        }
        Self::UpstreamUnreachable {
            upstream,
            reason: err.without_url().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Panic hook for `CatchPanicLayer`: the request gets a JSON 500 instead of a dropped connection.
/// The panic detail is logged only.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(detail = %detail, "handler panicked");

    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            ApiError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UpstreamTimeout {
                upstream: "Gemini",
                timeout_ms: 10
            }
            .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::InvalidProviderCredentials {
                upstream: "OpenWeather"
            }
            .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::UpstreamProtocol {
                upstream: "Gemini",
                reason: "bad".into()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn upstream_status_passes_through_error_codes_only() {
        let passthrough = ApiError::UpstreamStatus {
            upstream: "Gemini",
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "quota".into(),
        };
        assert_eq!(passthrough.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(passthrough.to_string().contains("quota"));

        let redirect = ApiError::UpstreamStatus {
            upstream: "Gemini",
            status: StatusCode::MOVED_PERMANENTLY,
            body: String::new(),
        };
        assert_eq!(redirect.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn credentials_message_mentions_invalid_credentials() {
        let err = ApiError::InvalidProviderCredentials {
            upstream: "OpenWeather",
        };
        assert!(err.to_string().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn panic_payload_becomes_internal_error() {
        let response = panic_response(Box::new("boom: secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "internal error");
        assert!(!body.to_string().contains("secret detail"));
    }
}
