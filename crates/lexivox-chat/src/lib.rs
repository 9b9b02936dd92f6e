//! Retrieval-grounded question answering for Lexivox.
//!
//! Provides the conversational core: bounded conversation memory, the
//! prompt assembler that grounds answers in retrieved statute chunks, the
//! language model client, per-caller sessions, and the controller that
//! sequences one question through embed, retrieve, assemble, generate, and
//! memory update.

pub mod controller;
pub mod error;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod session;

pub use controller::{AnswerResult, Phase, QaController};
pub use error::ChatError;
pub use llm::{LanguageModel, MockLanguageModel, OpenAiChat};
pub use memory::{ConversationMemory, Turn};
pub use prompt::{PromptAssembler, PromptEnvelope};
pub use session::Session;
