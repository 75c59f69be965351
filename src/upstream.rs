use axum::body::Bytes;
use reqwest::{RequestBuilder, StatusCode};
use tokio::time::{timeout, Duration};

use crate::error::ApiError;

/// Status and raw body of a completed upstream exchange.
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamReply {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends `request` and reads the whole body, both within `timeout_ms`.
pub async fn send(
    upstream: &'static str,
    timeout_ms: u64,
    request: RequestBuilder,
) -> Result<UpstreamReply, ApiError> {
    let exchange = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>(UpstreamReply { status, body })
    };

    timeout(Duration::from_millis(timeout_ms), exchange)
        .await
        .map_err(|_| ApiError::UpstreamTimeout {
            upstream,
            timeout_ms,
        })?
        .map_err(|err| ApiError::from_transport(upstream, timeout_ms, err))
}
