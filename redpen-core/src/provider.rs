//! Chat-completions adapter for the external analysis provider.
//!
//! Sends the source text with a fixed system prompt and JSON response mode,
//! then decodes `{"suggestions": [...]}` into [`SuggestionDraft`]s. Nothing
//! outside this module knows about HTTP, JSON, model names or prompt text.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::model::SuggestionDraft;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 10_000;
/// Whole-request deadline. A long text at the token limit can take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Instructions sent as the system message of every analysis request.
pub const SYSTEM_PROMPT: &str = r#"You are a careful writing assistant. Find the specific, necessary improvements in the text you are given and report them as structured JSON.

Rules:
1. Only report a change when one is needed. Text that is already correct, cohesive and sound must be left alone.
2. Report edits, not commentary. Never emit an entry that says no change is needed.
3. "original" must be the exact substring to replace, copied verbatim from the text. Keep it short but distinctive enough to be found by a plain substring search, and make sure it contains the problem itself rather than surrounding correct context.

Each entry in the "suggestions" array has these keys:
- "level": 1 for grammar and spelling, 2 for cohesion and structure, 3 for content and clarity.
- "original": the exact substring from the text.
- "replacement": the improved text.
- "reason": a short explanation of why the change is needed.

Order the suggestions as they occur in the text. Reply with a single JSON object whose only key is "suggestions". When nothing needs to change, reply with {"suggestions": []}."#;

/// Connection and sampling settings for [`OpenAiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Deadline for one request, connect to last body byte.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    finish_reason: Option<String>,
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<Value>,
}

#[derive(Deserialize)]
struct SuggestionsPayload {
    suggestions: Vec<SuggestionDraft>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Builds the HTTP client with the configured request deadline.
    ///
    /// # Errors
    ///
    /// `ProviderError::Transport` if the TLS backend cannot be initialised.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), COMPLETIONS_PATH)
    }

    /// Requests suggestions for `text` using the caller-held `api_key`.
    ///
    /// An empty suggestion list is a valid answer. Nothing is retried.
    ///
    /// # Errors
    ///
    /// See [`ProviderError`]: blank key, transport failure, non-2xx status,
    /// truncation at the token limit, missing content, or unparseable JSON.
    pub async fn analyze(&self, text: &str, api_key: &str) -> ProviderResult<Vec<SuggestionDraft>> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: text },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat { kind: "json_object" },
            max_tokens: self.config.max_tokens,
        };

        debug!(model = %self.config.model, chars = text.chars().count(), "sending analysis request");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .inspect_err(|e| warn!(timed_out = e.is_timeout(), error = %e, "analysis request failed"))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "analysis request rejected");
            return Err(ProviderError::Status { status: status.as_u16(), message });
        }

        let drafts = parse_completion(&body)?;
        debug!(suggestions = drafts.len(), "analysis response decoded");
        Ok(drafts)
    }
}

/// Pulls `error.message` out of an error body, if there is one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("error")?.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| "Unknown error".to_owned())
}

/// Decodes a successful chat-completions body into suggestion drafts.
fn parse_completion(body: &str) -> ProviderResult<Vec<SuggestionDraft>> {
    let response: ChatResponse = serde_json::from_str(body)?;
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(ProviderError::EmptyContent);
    };

    if choice.finish_reason.as_deref() == Some("length") {
        return Err(ProviderError::Truncated);
    }

    let content = choice.message.and_then(|m| m.content);
    let payload: SuggestionsPayload = match content {
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            serde_json::from_str::<SuggestionsPayload>(&raw)
                .inspect_err(|_| warn!(content = %raw, "unparseable analysis content"))?
        }
        // Some gateways hand back JSON mode content already decoded.
        Some(object @ Value::Object(_)) => serde_json::from_value(object)?,
        _ => return Err(ProviderError::EmptyContent),
    };
    Ok(payload.suggestions)
}
