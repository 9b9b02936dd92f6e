//! Text-to-speech over the Deepgram speak API.

use async_trait::async_trait;
use lexivox_core::{LexivoxError, Result};
use serde_json::json;
use tracing::debug;

const DEEPGRAM_SPEAK_URL: &str = "https://api.deepgram.com/v1/speak";

/// Turns answer text into audio bytes.
#[async_trait]
pub trait SpeechSynthesis: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Deepgram `POST /v1/speak` client.
pub struct DeepgramTts {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl DeepgramTts {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Read the API key from `DEEPGRAM_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("DEEPGRAM_API_KEY")
            .map_err(|_| LexivoxError::Speech("DEEPGRAM_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, model))
    }
}

#[async_trait]
impl SpeechSynthesis for DeepgramTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(LexivoxError::Speech("nothing to synthesize".to_string()));
        }

        debug!(chars = text.len(), model = %self.model, "Synthesizing speech");
        let response = self
            .client
            .post(DEEPGRAM_SPEAK_URL)
            .query(&[("model", self.model.as_str())])
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| LexivoxError::Speech(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LexivoxError::Speech(format!(
                "API returned {}: {}",
                status, detail
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| LexivoxError::Speech(format!("failed to read audio body: {}", e)))?;
        Ok(audio.to_vec())
    }
}

/// Deterministic synthesizer for tests: returns the text bytes unchanged.
pub struct MockSynthesis;

#[async_trait]
impl SpeechSynthesis for MockSynthesis {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(LexivoxError::Speech("nothing to synthesize".to_string()));
        }
        Ok(text.as_bytes().to_vec())
    }
}
