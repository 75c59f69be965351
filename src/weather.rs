use reqwest::StatusCode;
use serde_json::Value;

use crate::{config::AppConfig, error::ApiError, upstream};

pub const UPSTREAM: &str = "OpenWeather";

/// Fetches current weather for the coordinates and returns the upstream JSON untouched.
pub async fn current(
    http: &reqwest::Client,
    config: &AppConfig,
    lat: &str,
    lon: &str,
) -> Result<Value, ApiError> {
    tracing::debug!(lat, lon, "forwarding weather lookup");

    let request = http.get(config.weather_endpoint()).query(&[
        ("lat", lat),
        ("lon", lon),
        ("units", "metric"),
        ("appid", config.weather_api_key.as_str()),
    ]);

    let reply = upstream::send(UPSTREAM, config.weather_timeout_ms, request).await?;

    match reply.status {
        StatusCode::UNAUTHORIZED => {
            Err(ApiError::InvalidProviderCredentials { upstream: UPSTREAM })
        }
        status if !status.is_success() => Err(ApiError::UpstreamStatus {
            upstream: UPSTREAM,
            status,
            body: reply.body_text(),
        }),
        _ => serde_json::from_slice(&reply.body).map_err(|e| ApiError::UpstreamProtocol {
            upstream: UPSTREAM,
            reason: format!("not valid JSON: {e}"),
        }),
    }
}
