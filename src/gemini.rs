//! Gemini `generateContent` client used by the chat proxy.

use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError, upstream};

pub const UPSTREAM: &str = "Gemini";

/// Persona used when the caller sends no system instruction.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "आप ग्रामसहायक हैं, ग्रामीण भारत के किसानों और \
     परिवारों के लिए एक मददगार सहायक। सरल हिंदी में छोटे और व्यावहारिक उत्तर दें।";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// A single user turn; a blank instruction falls back to the default persona.
    pub fn new(prompt: &'a str, system_instruction: Option<&'a str>) -> Self {
        let instruction = system_instruction
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_INSTRUCTION);

        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart { text: instruction }],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Sends one prompt to Gemini and returns the generated text.
pub async fn generate(
    http: &reqwest::Client,
    config: &AppConfig,
    prompt: &str,
    system_instruction: Option<&str>,
) -> Result<String, ApiError> {
    let payload = GenerateContentRequest::new(prompt, system_instruction);

    tracing::debug!(model = %config.gemini_model, prompt_len = prompt.len(), "forwarding chat prompt");

    let request = http
        .post(config.gemini_endpoint())
        .query(&[("key", config.gemini_api_key.as_str())])
        .json(&payload);

    let reply = upstream::send(UPSTREAM, config.chat_timeout_ms, request).await?;

    if !reply.status.is_success() {
        return Err(ApiError::UpstreamStatus {
            upstream: UPSTREAM,
            status: reply.status,
            body: reply.body_text(),
        });
    }

    extract_reply(&reply.body)
}

/// Pulls the first candidate's first text part out of a raw response body.
pub fn extract_reply(body: &[u8]) -> Result<String, ApiError> {
    let parsed: GenerateContentResponse =
        serde_json::from_slice(body).map_err(|e| protocol_error(format!("not valid JSON: {e}")))?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| format!("prompt was blocked ({reason})"))
            .unwrap_or_else(|| "response contained no candidates".to_string());
        return Err(protocol_error(reason));
    };

    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| protocol_error("first candidate contained no text".to_string()))
}

fn protocol_error(reason: String) -> ApiError {
    ApiError::UpstreamProtocol {
        upstream: UPSTREAM,
        reason,
    }
}
