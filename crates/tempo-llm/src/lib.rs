//! Gemini API integration for the tempo task timer.
//!
//! Provides a single LLM-powered feature: grouping task names into named
//! categories for the summary rollup. Every failure mode here is recoverable:
//! the caller switches to the deterministic local fallback and never surfaces
//! an error to the user.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tempo_core::CategorySet;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const CATEGORIZE_MAX_TOKENS: u32 = 800;
const CATEGORIZE_TEMPERATURE: f32 = 0.2;

/// Classifier client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse or validate the response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Gemini API client.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Creates a new client with an explicit request timeout.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Overrides the API base URL, e.g. to point at a local server in tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Groups task names into categories using the Gemini API.
    ///
    /// On success every input task appears in exactly one category; a
    /// response that violates this is rejected as invalid. An empty input
    /// returns an empty set without a network call.
    pub async fn categorize_tasks(
        &self,
        model: &str,
        tasks: &[String],
    ) -> Result<CategorySet, LlmError> {
        if tasks.is_empty() {
            return Ok(CategorySet::default());
        }

        let prompt = build_categorize_prompt(tasks);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: CATEGORIZE_TEMPERATURE,
                max_output_tokens: CATEGORIZE_MAX_TOKENS,
            },
        };

        let url = format!("{}/{model}:generateContent", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = extract_text(payload)?;
        parse_category_response(&text, tasks)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let pieces: Vec<String> = response
        .candidates
        .into_iter()
        .flat_map(|c| c.content.parts)
        .map(|p| p.text)
        .filter(|t| !t.is_empty())
        .collect();
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_categorize_prompt(tasks: &[String]) -> String {
    let mut lines = Vec::new();
    lines.push(
        "You are a time-tracking assistant. Group the following task names into categories."
            .to_string(),
    );
    lines.push(
        "Return strict JSON: {\"categories\":[{\"name\":\"...\",\"tasks\":[\"...\"]}]}"
            .to_string(),
    );
    lines.push("Rules:".to_string());
    lines.push("- Category names are short, human-readable labels.".to_string());
    lines.push(
        "- Every task below must appear in exactly one category, spelled exactly as given."
            .to_string(),
    );
    lines.push("- Do not invent tasks. Do not emit empty categories.".to_string());
    lines.push(String::new());
    lines.push("Tasks:".to_string());
    for task in tasks {
        lines.push(format!("- {task}"));
    }
    lines.join("\n")
}

/// Strips a markdown code fence (and any surrounding noise) from a model
/// response, returning the JSON payload between the outermost braces.
fn strip_json_wrapping(text: &str) -> &str {
    let text = text.trim();

    // ```json ... ``` or ``` ... ```
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .map_or(text, |rest| rest.strip_suffix("```").unwrap_or(rest));
    let text = text.trim();

    // Tolerate prose before/after the object by slicing brace-to-brace.
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parses the model's text into a validated `CategorySet`.
fn parse_category_response(text: &str, tasks: &[String]) -> Result<CategorySet, LlmError> {
    let json = strip_json_wrapping(text);
    let mut set: CategorySet = serde_json::from_str(json)
        .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;

    set.categories.retain(|c| !c.tasks.is_empty());

    if !set.covers_exactly(tasks) {
        return Err(LlmError::InvalidResponse(
            "response does not cover every task exactly once".to_string(),
        ));
    }

    tracing::debug!(categories = set.categories.len(), "classifier response accepted");
    Ok(set)
}
