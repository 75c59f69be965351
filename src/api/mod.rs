mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use handlers::{chat, index, not_found, weather};
pub use models::{ChatRequest, ChatResponse, ErrorResponse, IndexResponse, WeatherQuery};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/weather", get(weather))
        .fallback(not_found)
        .with_state(state)
}
