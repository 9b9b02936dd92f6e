//! CLI argument definitions for the Lexivox application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lexivox — a voice-enabled legal assistant grounded in the Pakistan Penal Code.
#[derive(Parser, Debug)]
#[command(name = "lexivox", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape the statute page into a JSON file of sections.
    Scrape {
        /// Output path for the sections JSON (defaults to sections.json in
        /// the data directory).
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
    /// Build and persist the vector index from a statute source.
    BuildIndex {
        /// Statute PDF to extract, chunk, and embed.
        #[arg(long = "pdf", conflicts_with = "sections")]
        pdf: Option<PathBuf>,

        /// Scraped sections JSON to chunk and embed.
        #[arg(long = "sections", conflicts_with = "pdf")]
        sections: Option<PathBuf>,
    },
    /// Start an interactive question-answering session.
    Chat {
        /// Acknowledge that the persisted index file is deserialized without
        /// provenance checks. Loading is refused without this flag.
        #[arg(long = "trust-index")]
        trust_index: bool,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > LEXIVOX_CONFIG env var > ~/.lexivox/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("LEXIVOX_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    /// Returns `None` if not overridden.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".lexivox").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".lexivox").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_flag_wins() {
        let args = CliArgs::parse_from(["lexivox", "-c", "/tmp/custom.toml", "chat"]);
        assert_eq!(
            args.resolve_config_path(),
            PathBuf::from("/tmp/custom.toml")
        );
    }

    #[test]
    fn test_chat_requires_trust_flag_to_be_explicit() {
        let args = CliArgs::parse_from(["lexivox", "chat"]);
        match args.command {
            Command::Chat { trust_index } => assert!(!trust_index),
            _ => panic!("expected chat command"),
        }

        let args = CliArgs::parse_from(["lexivox", "chat", "--trust-index"]);
        match args.command {
            Command::Chat { trust_index } => assert!(trust_index),
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_build_index_sources_are_exclusive() {
        let result =
            CliArgs::try_parse_from(["lexivox", "build-index", "--pdf", "a.pdf", "--sections", "b.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_override() {
        let args = CliArgs::parse_from(["lexivox", "-l", "debug", "scrape"]);
        assert_eq!(args.resolve_log_level().as_deref(), Some("debug"));
    }
}
