use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{error::ApiError, gemini, weather as openweather, AppState};

use super::models::{ChatRequest, ChatResponse, ErrorResponse, IndexResponse, WeatherQuery};

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "ok",
        message: "GramSahayak backend is running",
        endpoints: BTreeMap::from([
            ("/api/chat", "POST - Gemini AI chat"),
            ("/api/weather", "GET - Real-time weather (requires lat, lon)"),
        ]),
    })
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    // serde would also accept a positional array for the struct.
    if !payload.is_object() {
        return Err(ApiError::InvalidRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }
    let payload: ChatRequest = serde_json::from_value(payload)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid request body: {e}")))?;

    let prompt = non_blank(payload.prompt.as_deref())
        .ok_or_else(|| ApiError::InvalidRequest("Missing prompt".to_string()))?;

    let reply = gemini::generate(
        &state.http,
        &state.config,
        prompt,
        payload.system_instruction.as_deref(),
    )
    .await?;

    Ok(Json(ChatResponse { reply }))
}

pub async fn weather(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    let (Some(lat), Some(lon)) = (non_blank(query.lat.as_deref()), non_blank(query.lon.as_deref()))
    else {
        return Err(ApiError::InvalidRequest(
            "Missing lat/lon parameters".to_string(),
        ));
    };

    let body = openweather::current(&state.http, &state.config, lat, lon).await?;
    Ok(Json(body))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
