//! Google Gemini `generateContent` client.
//!
//! # Responsibility
//! - Send one schema-constrained request and return the parsed JSON answer.
//!
//! # Invariants
//! - The API key travels in the `x-goog-api-key` header, never in the URL or logs.
//! - Error bodies are truncated before they are surfaced.

use crate::interpret::{GenerateRequest, InterpretError, InterpretResult, LanguageModel};
use crate::logging::sanitize_message;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Blocking Gemini client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Builds a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> InterpretResult<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> InterpretResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(InterpretError::Config("API key is empty".to_string()));
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(InterpretError::Config(format!(
                "base URL must be http(s), got `{base_url}`"
            )));
        }

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

impl LanguageModel for GeminiClient {
    fn generate_json(&self, request: &GenerateRequest) -> InterpretResult<Value> {
        let started_at = Instant::now();
        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request_body(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(
                "event=llm_request module=interpret status=error model={} http_status={} duration_ms={}",
                request.model,
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(InterpretError::Status {
                code: status.as_u16(),
                body: sanitize_message(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: GenerateContentResponse = response.json()?;
        debug!(
            "event=llm_request module=interpret status=ok model={} duration_ms={}",
            request.model,
            started_at.elapsed().as_millis()
        );
        let text = first_candidate_text(body).ok_or(InterpretError::EmptyResponse)?;
        parse_json_text(&text)
    }
}

fn request_body(request: &GenerateRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema
        }
    })
}

fn first_candidate_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .find_map(|candidate| candidate.content)?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parses model text as JSON, tolerating a surrounding ```json fence.
pub(crate) fn parse_json_text(text: &str) -> InterpretResult<Value> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced.trim()).map_err(|err| InterpretError::Decode(err.to_string()))
}
