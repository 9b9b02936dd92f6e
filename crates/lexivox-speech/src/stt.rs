//! Speech-to-text over the Deepgram prerecorded-audio API.

use async_trait::async_trait;
use lexivox_core::{LexivoxError, Result};
use serde_json::Value;
use tracing::debug;

const DEEPGRAM_LISTEN_URL: &str = "https://api.deepgram.com/v1/listen";

/// Transcribes WAV audio bytes to text.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe mono PCM WAV bytes.
    ///
    /// Fails with a transport error if the service is unreachable, and with
    /// a distinct error if the audio contained no recognizable speech.
    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String>;
}

/// Deepgram `POST /v1/listen` client.
pub struct DeepgramStt {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl DeepgramStt {
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
            .map_err(|_| LexivoxError::Transcription("DEEPGRAM_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, model))
    }
}

#[async_trait]
impl TranscriptionService for DeepgramStt {
    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        debug!(bytes = wav_bytes.len(), model = %self.model, "Transcribing audio");
        let response = self
            .client
            .post(DEEPGRAM_LISTEN_URL)
            .query(&[
                ("model", self.model.as_str()),
                ("smart_format", "true"),
                ("language", "en"),
            ])
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(wav_bytes.to_vec())
            .send()
            .await
            .map_err(|e| LexivoxError::Transcription(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LexivoxError::Transcription(format!(
                "API returned {}: {}",
                status, detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LexivoxError::Transcription(format!("invalid response body: {}", e)))?;
        parse_transcript(&payload)
    }
}

fn parse_transcript(payload: &Value) -> Result<String> {
    let transcript = payload["results"]["channels"][0]["alternatives"][0]["transcript"]
        .as_str()
        .ok_or_else(|| LexivoxError::Transcription("response missing transcript".to_string()))?
        .trim()
        .to_string();

    if transcript.is_empty() {
        return Err(LexivoxError::Transcription(
            "no speech recognized in audio".to_string(),
        ));
    }
    Ok(transcript)
}

/// Fixed-transcript service for tests.
pub struct MockTranscription {
    transcript: String,
}

impl MockTranscription {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }
}

#[async_trait]
impl TranscriptionService for MockTranscription {
    async fn transcribe(&self, wav_bytes: &[u8]) -> Result<String> {
        if wav_bytes.is_empty() {
            return Err(LexivoxError::Transcription(
                "no speech recognized in audio".to_string(),
            ));
        }
        Ok(self.transcript.clone())
    }
}
