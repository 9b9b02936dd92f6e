//! Language model clients.
//!
//! [`LanguageModel`] is the seam between the controller and whatever
//! produces answers. [`OpenAiChat`] talks to the OpenAI chat completions
//! API; [`MockLanguageModel`] is a deterministic stand-in for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lexivox_core::{LexivoxError, Result};
use serde_json::{json, Value};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Maps a rendered prompt to generated text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// OpenAI chat completions client.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAiChat {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Read the API key from `OPENAI_API_KEY`.
    pub fn from_env(model: impl Into<String>, temperature: f64) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LexivoxError::Generation("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, model, temperature))
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LexivoxError::Generation(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LexivoxError::Generation(format!(
                "API returned {}: {}",
                status, detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LexivoxError::Generation(format!("invalid response body: {}", e)))?;
        parse_chat_response(&payload)
    }
}

fn parse_chat_response(payload: &Value) -> Result<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| LexivoxError::Generation("response missing message content".to_string()))
}

/// Deterministic model for tests. Returns a fixed reply and counts calls.
pub struct MockLanguageModel {
    reply: String,
    calls: AtomicUsize,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::with_reply("I don't know")
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `generate` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}
