//! The question-answering controller.
//!
//! Sequences one question through a fixed pipeline: embed the question,
//! retrieve the closest chunks, assemble the grounded prompt, generate an
//! answer, then record the turn. The turn is atomic with respect to memory:
//! the append happens last, so a failure at any earlier phase leaves the
//! conversation exactly as it was. A turn that fails moves through
//! [`Phase::Failed`] and surfaces a [`ChatError`]; it is never recorded.

use std::sync::Arc;
use std::time::Duration;

use lexivox_core::config::ChatConfig;
use lexivox_core::RetrievalResult;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::llm::LanguageModel;
use crate::prompt::PromptAssembler;
use crate::session::Session;
use lexivox_index::EmbeddingService;

/// Where a turn is in its lifecycle. Logged on every transition; `Failed`
/// is terminal for the turn, not the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Embedding,
    Retrieving,
    Assembling,
    Generating,
    UpdatingMemory,
    Failed,
}

/// A completed turn: the answer plus the chunks it was grounded in, in
/// retrieval order.
#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<RetrievalResult>,
}

impl AnswerResult {
    /// Human-readable source attributions, e.g. `ppc.pdf#45`.
    pub fn source_labels(&self) -> Vec<String> {
        self.sources.iter().map(|r| r.chunk.source_label()).collect()
    }
}

/// Drives questions through the embed/retrieve/assemble/generate pipeline.
pub struct QaController {
    embedder: Arc<dyn EmbeddingService>,
    model: Arc<dyn LanguageModel>,
    assembler: PromptAssembler,
    top_k: usize,
    call_timeout: Duration,
}

impl QaController {
    pub fn new(
        embedder: Arc<dyn EmbeddingService>,
        model: Arc<dyn LanguageModel>,
        top_k: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            model,
            assembler: PromptAssembler::new(),
            top_k,
            call_timeout,
        }
    }

    pub fn with_config(
        embedder: Arc<dyn EmbeddingService>,
        model: Arc<dyn LanguageModel>,
        config: &ChatConfig,
    ) -> Self {
        Self::new(
            embedder,
            model,
            config.top_k,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Answer one question within the given session.
    ///
    /// Rejects empty questions with [`ChatError::InvalidInput`] before
    /// touching the session. Rejects a question while another is in flight
    /// with [`ChatError::SessionBusy`]. Either the whole turn succeeds and
    /// is appended to memory, or nothing is recorded.
    pub async fn ask(
        &self,
        session: &Session,
        question: &str,
    ) -> Result<AnswerResult, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::InvalidInput);
        }

        let mut memory = session.try_begin()?;
        let session_id = session.id();

        let mut phase = Phase::Embedding;
        debug!(session_id = %session_id, phase = ?phase, "Embedding question");
        let embedding = match timeout(self.call_timeout, self.embedder.embed(question)).await {
            Ok(Ok(vector)) => vector,
            Ok(Err(e)) => return Err(self.fail(session_id, phase, ChatError::EmbeddingFailure(e.to_string()))),
            Err(_) => {
                return Err(self.fail(
                    session_id,
                    phase,
                    ChatError::EmbeddingFailure(format!(
                        "timed out after {:?}",
                        self.call_timeout
                    )),
                ))
            }
        };

        phase = Phase::Retrieving;
        let retrieved = session.index().search(&embedding, self.top_k);
        debug!(
            session_id = %session_id,
            phase = ?phase,
            retrieved = retrieved.len(),
            "Retrieved context chunks"
        );

        phase = Phase::Assembling;
        let history = memory.render().to_vec();
        let envelope = self.assembler.assemble(question, &retrieved, &history);

        phase = Phase::Generating;
        debug!(session_id = %session_id, phase = ?phase, "Generating answer");
        let answer = match timeout(self.call_timeout, self.model.generate(&envelope.render())).await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(self.fail(session_id, phase, ChatError::GenerationFailure(e.to_string()))),
            Err(_) => {
                return Err(self.fail(
                    session_id,
                    phase,
                    ChatError::GenerationFailure(format!(
                        "timed out after {:?}",
                        self.call_timeout
                    )),
                ))
            }
        };

        phase = Phase::UpdatingMemory;
        memory.append(question, &answer);
        info!(
            session_id = %session_id,
            phase = ?phase,
            sources = retrieved.len(),
            turns = memory.len(),
            "Turn recorded"
        );

        Ok(AnswerResult {
            answer,
            sources: retrieved,
        })
    }

    fn fail(&self, session_id: uuid::Uuid, phase: Phase, error: ChatError) -> ChatError {
        warn!(
            session_id = %session_id,
            failed_in = ?phase,
            phase = ?Phase::Failed,
            error = %error,
            "Turn failed"
        );
        error
    }
}
