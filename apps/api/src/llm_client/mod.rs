/// LLM client: the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion endpoint directly.
/// Everything goes through `CompletionClient`, which the interview service holds
/// as `Arc<dyn CompletionClient>`.
///
/// Endpoint: OpenAI-compatible `/chat/completions` (OpenRouter by default).
/// No retries: a failed call is reported once and the caller decides what to do.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[cfg(test)]
pub mod fake;

/// Backend A. Also used for question generation and clarification.
pub const GEMINI_MODEL: &str = "google/gemini-2.0-flash-thinking-exp:free";
/// Backend B. Only used for evaluation.
pub const QWEN_MODEL: &str = "qwen/qwen-vl-plus:free";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not configured. Set OPENROUTER_API_KEY to enable model calls")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sends one user-role prompt to one model and returns the reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError>;

    /// False when calls are known to fail before reaching the network.
    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
    // OpenRouter reports some upstream failures inside a 200 body.
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    code: Option<serde_json::Value>,
}

/// HTTP implementation of `CompletionClient` for OpenRouter-style endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    site_url: String,
    site_name: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.llm_timeout_secs))
                .build()?,
            api_key: config.openrouter_api_key.clone(),
            endpoint: format!("{}/chat/completions", config.openrouter_base_url),
            site_url: config.site_url.clone(),
            site_name: config.site_name.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.site_name)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Completion API returned {status} for model {model}: {message}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_content(&body)?;
        debug!("Completion succeeded: model={model}, chars={}", text.len());
        Ok(text)
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Pulls the first choice's message text out of a successful response body.
fn extract_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse = serde_json::from_str(body)?;

    if let Some(err) = parsed.error {
        let status = err
            .code
            .as_ref()
            .and_then(|c| c.as_u64())
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(502);
        return Err(LlmError::Api {
            status,
            message: err.message,
        });
    }

    if let Some(usage) = &parsed.usage {
        debug!(
            "Token usage: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}
