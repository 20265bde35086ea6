//! Covenant LLM Provider Layer
//!
//! Chat-completion provider implementations for semantic section lookup.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `covenant-domain`.
//! It supports multiple LLM backends with a common interface.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use covenant_llm::MockProvider;
//! use covenant_domain::{ChatPrompt, LlmProvider};
//!
//! let provider = MockProvider::new("{}");
//! let result = provider.generate(&ChatPrompt::new("system", "user")).unwrap();
//! assert_eq!(result, "{}");
//! ```

#![warn(missing_docs)]

pub mod openai;

use covenant_domain::{ChatPrompt, LlmProvider as LlmProviderTrait};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// API key rejected
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

const ERROR_MARKER: &str = "\u{0}ERROR";

/// Mock LLM provider for deterministic testing
///
/// Responses are keyed by the user part of the prompt. No network calls are made.
///
/// # Examples
///
/// ```
/// use covenant_llm::MockProvider;
/// use covenant_domain::{ChatPrompt, LlmProvider};
///
/// let mut provider = MockProvider::default();
/// provider.add_response("payload one", "response one");
/// let prompt = ChatPrompt::new("sys", "payload one");
/// assert_eq!(provider.generate(&prompt).unwrap(), "response one");
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    prompts: Arc<Mutex<Vec<ChatPrompt>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock".to_string(),
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given user prompt
    pub fn add_response(&mut self, user_prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(user_prompt.into(), response.into());
    }

    /// Configure to return an error for a specific user prompt
    pub fn add_error(&mut self, user_prompt: impl Into<String>) {
        lock(&self.responses).insert(user_prompt.into(), ERROR_MARKER.to_string());
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<ChatPrompt> {
        lock(&self.prompts).clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

// A panicking test thread must not poison the mock for the others.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &ChatPrompt) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.clone());

        let responses = lock(&self.responses);
        match responses.get(&prompt.user) {
            Some(response) if response == ERROR_MARKER => {
                Err(LlmError::Other("Mock error".to_string()))
            }
            Some(response) => Ok(response.clone()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn generate_structured(&self, prompt: &ChatPrompt) -> Result<String, Self::Error> {
        self.generate(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(user: &str) -> ChatPrompt {
        ChatPrompt::new("system", user)
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate(&prompt("any")).unwrap(), "Test response");
        assert_eq!(provider.model_name(), "mock");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate(&prompt("hello")).unwrap(), "world");
        assert_eq!(provider.generate(&prompt("foo")).unwrap(), "bar");
        assert_eq!(provider.generate(&prompt("unknown")).unwrap(), "{}");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate(&prompt("p1")).unwrap();
        provider.generate_structured(&prompt("p2")).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts()[1].user, "p2");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate(&prompt("bad prompt"));
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate(&prompt("test")).unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
