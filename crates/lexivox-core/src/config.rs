use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LexivoxError, Result};

/// Top-level configuration for the Lexivox application.
///
/// Loaded from `~/.lexivox/config.toml` by default. Each section corresponds
/// to one stage of the pipeline or a cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexivoxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl LexivoxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LexivoxConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LexivoxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the persisted index and synthesized audio.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.lexivox/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Statute scraping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// URL of the statute page to scrape.
    pub statute_url: String,
    /// User-Agent header sent with the request. Some statute mirrors reject
    /// requests without a browser-looking agent.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            statute_url: "https://www.pakistani.org/pakistan/legislation/1860/actXLVof1860.html"
                .to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

/// Index build and retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the persisted vector index.
    pub index_dir: String,
    /// Name of the persisted index (file stem).
    pub index_name: String,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Embedding vector dimensionality.
    pub embedding_dim: usize,
    /// Number of chunks embedded per API request during index build.
    pub embed_batch_size: usize,
    /// Embedding request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: "vectorstore".to_string(),
            index_name: "index".to_string(),
            chunk_size: 500,
            chunk_overlap: 50,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dim: 1536,
            embed_batch_size: 64,
            timeout_secs: 30,
        }
    }
}

/// Question-answering session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Maximum number of turns retained in conversation memory. Oldest turns
    /// are evicted first once the cap is reached.
    pub memory_cap: usize,
    /// Chat completion model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Per-call timeout for embedding and generation requests, in seconds.
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            memory_cap: 20,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.4,
            timeout_secs: 30,
        }
    }
}

/// Speech-to-text and text-to-speech configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether spoken answers are enabled in the chat loop.
    pub enabled: bool,
    /// Capture sample rate in Hz. The transcription API expects mono PCM at
    /// this rate.
    pub sample_rate: u32,
    /// Maximum recording duration in seconds.
    pub max_record_secs: u32,
    /// Transcription model identifier.
    pub stt_model: String,
    /// Synthesis voice/model identifier.
    pub tts_model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: 16_000,
            max_record_secs: 5,
            stt_model: "nova-3".to_string(),
            tts_model: "aura-asteria-en".to_string(),
            timeout_secs: 30,
        }
    }
}
