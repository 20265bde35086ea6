//! OpenAI Provider Implementation
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint.
//!
//! # Features
//!
//! - Async HTTP communication with bearer authentication
//! - JSON-only response mode for structured generation
//! - Retry logic with exponential backoff on transient failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use covenant_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o-mini")
//!     .with_max_tokens(800)
//!     .with_temperature(0.0);
//! ```

use crate::LlmError;
use covenant_domain::{ChatPrompt, LlmProvider as LlmProviderTrait};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for requests; prompts carry up to 100k characters
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default response budget
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
    timeout: Duration,
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

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider for `model` using `api_key`
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point at a different OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the response token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn request<'a>(&'a self, prompt: &'a ChatPrompt, json_only: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: json_only.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    /// Send a chat completion and return the first choice's content
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The key is rejected (no retry)
    /// - The model does not exist (no retry)
    /// - Network communication fails after all retries
    /// - The response has no choices
    pub async fn complete(&self, prompt: &ChatPrompt, json_only: bool) -> Result<String, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build client: {}", e)))?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request(prompt, json_only);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            debug!(model = %self.model, attempt = attempts + 1, "sending chat completion");
            match client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return parsed
                            .choices
                            .into_iter()
                            .next()
                            .map(|choice| choice.message.content.unwrap_or_default())
                            .ok_or_else(|| {
                                LlmError::InvalidResponse("Response contained no choices".to_string())
                            });
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    match status {
                        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                            return Err(LlmError::Unauthorized(format!("HTTP {}", status)));
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.model.clone()));
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        _ => {
                            last_error = Some(LlmError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(?delay, "chat completion failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn block_on(&self, prompt: &ChatPrompt, json_only: bool) -> Result<String, LlmError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
        runtime.block_on(self.complete(prompt, json_only))
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &ChatPrompt) -> Result<String, Self::Error> {
        self.block_on(prompt, false)
    }

    fn generate_structured(&self, prompt: &ChatPrompt) -> Result<String, Self::Error> {
        self.block_on(prompt, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("key", "gpt-4o-mini");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model_name(), "gpt-4o-mini");
        assert_eq!(provider.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(provider.temperature, 0.0);
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_builder_options() {
        let provider = OpenAiProvider::new("key", "m")
            .with_base_url("http://localhost:8080/v1/")
            .with_max_tokens(100)
            .with_temperature(0.5)
            .with_max_retries(0);
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
        assert_eq!(provider.max_tokens, 100);
        assert_eq!(provider.temperature, 0.5);
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_structured_request_body() {
        let provider = OpenAiProvider::new("key", "gpt-4o-mini");
        let prompt = ChatPrompt::new("be terse", "{\"targets\": []}");

        let body = serde_json::to_value(provider.request(&prompt, true)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "{\"targets\": []}");
        assert_eq!(body["response_format"]["type"], "json_object");

        let plain = serde_json::to_value(provider.request(&prompt, false)).unwrap();
        assert!(plain.get("response_format").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "{}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_error_handling() {
        // Invalid port forces a request failure
        let provider = OpenAiProvider::new("key", "m")
            .with_base_url("http://localhost:99999")
            .with_max_retries(1);

        let result = provider.complete(&ChatPrompt::new("s", "u"), true).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
