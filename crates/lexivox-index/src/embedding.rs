//! Embedding service trait and implementations.
//!
//! - `OpenAiEmbedding` calls the hosted embeddings API over HTTPS. Batch
//!   requests (used by the offline index build) retry transient failures
//!   with exponential backoff; single-text requests (used by the live
//!   question path) make exactly one attempt, leaving retry policy to the
//!   caller.
//! - `MockEmbedding` provides deterministic hash-based vectors for testing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use lexivox_core::error::{LexivoxError, Result};

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Service for generating text embeddings.
///
/// Implementations convert text into fixed-dimensional vectors that capture
/// semantic meaning. Used for both indexing and query embedding.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for a batch of texts, in input order.
    ///
    /// The default implementation embeds one text at a time; providers with
    /// a batch endpoint override this.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;
}

// ---------------------------------------------------------------------------
// OpenAiEmbedding - hosted embeddings API
// ---------------------------------------------------------------------------

/// Embedding service backed by the OpenAI embeddings endpoint.
pub struct OpenAiEmbedding {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    max_retries: u32,
}

impl std::fmt::Debug for OpenAiEmbedding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedding")
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl OpenAiEmbedding {
    /// Create a service with an explicit API key.
    pub fn new(
        api_key: String,
        model: String,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LexivoxError::Embedding(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            model,
            dimensions,
            max_retries: 3,
        })
    }

    /// Create a service reading the API key from `OPENAI_API_KEY`.
    pub fn from_env(model: String, dimensions: usize, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LexivoxError::Embedding("OPENAI_API_KEY not set".to_string()))?;
        Self::new(api_key, model, dimensions, timeout)
    }

    /// Issue the embeddings request, retrying transient failures up to
    /// `attempts` times total. Rate limiting (429) and server errors retry
    /// with exponential backoff; other client errors fail immediately.
    async fn request(&self, texts: &[String], attempts: u32) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let mut last_err = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                debug!(attempt, delay_secs = delay.as_secs(), "Retrying embedding request");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(OPENAI_EMBEDDINGS_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let json: serde_json::Value = response.json().await.map_err(|e| {
                            LexivoxError::Embedding(format!("Malformed response body: {}", e))
                        })?;
                        return parse_embeddings_response(&json, texts.len());
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(LexivoxError::Embedding(format!(
                            "API error {}: {}",
                            status, body_text
                        )));
                        continue;
                    }
                    return Err(LexivoxError::Embedding(format!(
                        "API error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(LexivoxError::Embedding(format!("Transport error: {}", e)));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| LexivoxError::Embedding("Embedding request failed".to_string())))
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Err(LexivoxError::Embedding("Cannot embed empty text".to_string()));
        }
        // Single attempt on the live question path; the session controller
        // surfaces the failure and leaves retries to its caller.
        let mut vectors = self.request(&[text.to_string()], 1).await?;
        vectors
            .pop()
            .ok_or_else(|| LexivoxError::Embedding("Empty response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        info!(count = texts.len(), model = %self.model, "Embedding batch");
        self.request(texts, self.max_retries + 1).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Parse the embeddings API response JSON into vectors, in input order.
fn parse_embeddings_response(
    json: &serde_json::Value,
    expected: usize,
) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| {
            LexivoxError::Embedding("Malformed response: missing data array".to_string())
        })?;

    let mut embeddings = Vec::with_capacity(data.len());
    for item in data {
        let values = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| {
                LexivoxError::Embedding("Malformed response: missing embedding".to_string())
            })?;
        let vec: Vec<f32> = values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        embeddings.push(vec);
    }

    if embeddings.len() != expected {
        warn!(
            got = embeddings.len(),
            expected, "Embedding count does not match input count"
        );
        return Err(LexivoxError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            embeddings.len()
        )));
    }

    Ok(embeddings)
}

// ---------------------------------------------------------------------------
// MockEmbedding - deterministic hash-based vectors for testing
// ---------------------------------------------------------------------------

/// Mock embedding service that returns deterministic vectors.
///
/// The output is derived from a hash of the input text, so identical inputs
/// always produce identical outputs. Vectors are L2-normalized, matching
/// what the hosted model returns.
#[derive(Debug, Clone)]
pub struct MockEmbedding {
    dimensions: usize,
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self { dimensions: 384 }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.dimensions);
        for i in 0..self.dimensions {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);
            let h = hasher.finish();
            let val = ((h as f64) / (u64::MAX as f64)) * 2.0 - 1.0;
            result.push(val as f32);
        }

        let norm: f32 = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        result
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.is_empty() {
            return Err(LexivoxError::Embedding("Cannot embed empty text".to_string()));
        }
        Ok(self.hash_to_vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
