//! Lexivox application binary - composition root.
//!
//! Ties the pipeline crates together behind three subcommands:
//! 1. `scrape` — fetch the statute page and write its sections as JSON
//! 2. `build-index` — chunk and embed a statute source, persist the index
//! 3. `chat` — interactive grounded question answering over the index
//!
//! Chat optionally speaks answers: with `[speech] enabled = true` each
//! answer is synthesized and written to the data directory. Playback is left
//! to the user.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use lexivox_chat::{OpenAiChat, QaController, Session};
use lexivox_core::config::LexivoxConfig;
use lexivox_index::{IndexBuilder, OpenAiEmbedding};
use lexivox_ingest::{build_section_index, extract_pdf_text, StatuteScraper, StatuteSection};
use lexivox_speech::{DeepgramStt, DeepgramTts, SpeechSynthesis, TranscriptionService};

mod cli;
use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = LexivoxConfig::load_or_default(&config_file);

    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Lexivox v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let data_dir = resolve_data_dir(&config.general.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    match args.command {
        Command::Scrape { out } => run_scrape(&config, &data_dir, out).await,
        Command::BuildIndex { pdf, sections } => run_build_index(&config, pdf, sections).await,
        Command::Chat { trust_index } => run_chat(&config, &data_dir, trust_index).await,
    }
}

/// Fetch the statute page and write its sections to a JSON file.
async fn run_scrape(
    config: &LexivoxConfig,
    data_dir: &Path,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let scraper = StatuteScraper::from_config(&config.scrape)?;
    let sections = scraper.fetch_sections().await?;

    let out = out.unwrap_or_else(|| data_dir.join("sections.json"));
    let json = serde_json::to_string_pretty(&sections)?;
    std::fs::write(&out, json)?;

    println!("Scraped {} sections to {}", sections.len(), out.display());
    Ok(())
}

/// Chunk, embed, and persist a statute source as the vector index.
async fn run_build_index(
    config: &LexivoxConfig,
    pdf: Option<PathBuf>,
    sections: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let embedder = OpenAiEmbedding::from_env(
        config.index.embedding_model.clone(),
        config.index.embedding_dim,
        Duration::from_secs(config.index.timeout_secs),
    )?;
    let mut builder = IndexBuilder::with_config(embedder, &config.index);

    let index_dir = PathBuf::from(&config.index.index_dir);
    std::fs::create_dir_all(&index_dir)?;

    match (pdf, sections) {
        (Some(pdf), None) => {
            let text = extract_pdf_text(&pdf)?;

            // Section lookup table alongside the index, for inspection.
            let section_index = build_section_index(&text);
            if !section_index.is_empty() {
                let path = index_dir.join(format!("{}.sections.json", config.index.index_name));
                std::fs::write(&path, serde_json::to_string_pretty(&section_index)?)?;
                println!("Indexed {} section headings to {}", section_index.len(), path.display());
            }

            builder.add_document(&pdf.display().to_string(), &text);
        }
        (None, Some(path)) => {
            let json = std::fs::read_to_string(&path)?;
            let sections: Vec<StatuteSection> = serde_json::from_str(&json)?;
            let source_id = path.display().to_string();
            for section in &sections {
                builder.add_passage(&source_id, &section.number.to_string(), &section.to_text());
            }
        }
        _ => return Err("pass exactly one of --pdf or --sections".into()),
    }

    println!("Embedding {} chunks...", builder.pending_count());
    let index = builder
        .build_and_save(&index_dir, &config.index.index_name)
        .await?;

    println!(
        "Indexed {} chunks into {}/{}.index.json",
        index.len(),
        config.index.index_dir,
        config.index.index_name
    );
    Ok(())
}

/// Interactive question-answering loop over the persisted index.
async fn run_chat(
    config: &LexivoxConfig,
    data_dir: &Path,
    trust_index: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let index_dir = PathBuf::from(&config.index.index_dir);
    let session = Session::open(
        &index_dir,
        &config.index.index_name,
        trust_index,
        config.chat.memory_cap,
    )?;

    let embedder = Arc::new(OpenAiEmbedding::from_env(
        config.index.embedding_model.clone(),
        config.index.embedding_dim,
        Duration::from_secs(config.index.timeout_secs),
    )?);
    let model = Arc::new(OpenAiChat::from_env(
        config.chat.model.clone(),
        config.chat.temperature,
    )?);
    let qa = QaController::with_config(embedder, model, &config.chat);

    let tts: Option<DeepgramTts> = if config.speech.enabled {
        Some(DeepgramTts::from_env(config.speech.tts_model.clone())?)
    } else {
        None
    };
    let stt = DeepgramStt::from_env(config.speech.stt_model.clone()).ok();

    println!("Ask about the Pakistan Penal Code. Commands: :reset, :voice <wav file>, :quit");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut answered = 0u32;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        let question = match line.as_str() {
            "" => continue,
            ":quit" | ":q" => break,
            ":reset" => {
                session.reset().await;
                println!("Conversation memory cleared.");
                continue;
            }
            _ if line.starts_with(":voice") => {
                let path = line.trim_start_matches(":voice").trim();
                if path.is_empty() {
                    println!("Usage: :voice <wav file>");
                    continue;
                }
                let Some(stt) = &stt else {
                    println!("Set DEEPGRAM_API_KEY to use voice input.");
                    continue;
                };
                match transcribe_file(stt, Path::new(path)).await {
                    Ok(text) => {
                        println!("Heard: {}", text);
                        text
                    }
                    Err(e) => {
                        println!("Could not transcribe {}: {}", path, e);
                        continue;
                    }
                }
            }
            _ => line,
        };

        match qa.ask(&session, &question).await {
            Ok(result) => {
                println!("\n{}\n", result.answer);
                let labels = result.source_labels();
                if !labels.is_empty() {
                    println!("Sources: {}", labels.join(", "));
                }
                answered += 1;

                if let Some(tts) = &tts {
                    speak_answer(tts, &result.answer, data_dir, answered).await;
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    println!("Goodbye.");
    Ok(())
}

async fn transcribe_file(
    stt: &DeepgramStt,
    path: &Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let wav_bytes = std::fs::read(path)?;
    Ok(stt.transcribe(&wav_bytes).await?)
}

/// Synthesize an answer and write it next to the index data. Synthesis
/// failures are reported but never fail the turn.
async fn speak_answer(tts: &DeepgramTts, answer: &str, data_dir: &Path, turn: u32) {
    match tts.synthesize(answer).await {
        Ok(audio) => {
            let path = data_dir.join(format!("answer-{:03}.mp3", turn));
            match std::fs::write(&path, audio) {
                Ok(()) => println!("Spoken answer saved to {}", path.display()),
                Err(e) => tracing::warn!(error = %e, "Failed to write synthesized audio"),
            }
        }
        Err(e) => tracing::warn!(error = %e, "Speech synthesis failed"),
    }
}

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}
