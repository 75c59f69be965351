#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, Router};
use gram_sahayak_proxy::{build_app, AppConfig, AppState};
use http::{Method, Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;

pub const GEMINI_KEY: &str = "test-gemini-key";
pub const WEATHER_KEY: &str = "test-weather-key";
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Serves `app` on an ephemeral port and returns its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn test_config(gemini_base: &str, weather_base: &str) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        gemini_api_key: GEMINI_KEY.to_string(),
        gemini_api_base: gemini_base.to_string(),
        gemini_model: "gemini-test".to_string(),
        chat_timeout_ms: 5_000,
        weather_api_key: WEATHER_KEY.to_string(),
        weather_api_base: weather_base.to_string(),
        weather_timeout_ms: 5_000,
    }
}

pub fn build_test_app(config: AppConfig) -> Router {
    build_app(Arc::new(AppState::new(config).unwrap()))
}

pub fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
