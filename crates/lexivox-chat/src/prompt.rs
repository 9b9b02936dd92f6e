//! Prompt assembly for grounded legal answers.
//!
//! The assembler is a pure function from retrieved chunks, conversation
//! history, and a question to a [`PromptEnvelope`]. It never fails: empty
//! retrieval produces an envelope with an empty context section, and the
//! grounding instruction steers the model toward "I don't know" when the
//! context cannot support an answer.

use lexivox_core::RetrievalResult;

use crate::memory::Turn;

const SYSTEM_INSTRUCTIONS: &str = "\
You are a legal assistant specializing in the Pakistan Penal Code of 1860.
Use only the content provided in the retrieved context to answer questions.

If the answer is not available in the context, say \"I don't know\".

Always:
- Be concise.
- Explain legal concepts in plain English.
- Mention relevant section numbers if applicable.";

/// The structured prompt handed to the language model.
///
/// `context` holds at most top-k chunk texts in retrieval order; `history`
/// holds at most the memory cap of turns, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptEnvelope {
    pub context: Vec<String>,
    pub history: Vec<Turn>,
    pub question: String,
}

impl PromptEnvelope {
    /// Render the envelope into the single prompt string sent to the model.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(SYSTEM_INSTRUCTIONS);
        out.push_str("\n\nContext:\n");
        if self.context.is_empty() {
            out.push_str("(no relevant context found)\n");
        } else {
            for text in &self.context {
                out.push_str(text);
                out.push_str("\n\n");
            }
        }

        out.push_str("\nChat History:\n");
        for turn in &self.history {
            out.push_str("User: ");
            out.push_str(&turn.question);
            out.push('\n');
            out.push_str("Assistant: ");
            out.push_str(&turn.answer);
            out.push('\n');
        }

        out.push_str("\nQuestion:\n");
        out.push_str(&self.question);
        out.push_str("\n\nAnswer:\n");
        out
    }
}

/// Builds [`PromptEnvelope`]s under a fixed legal-domain template.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble an envelope from retrieval results, history, and a question.
    ///
    /// Deterministic and total: any combination of inputs, including empty
    /// retrieval and empty history, yields a valid envelope.
    pub fn assemble(
        &self,
        question: &str,
        retrieved: &[RetrievalResult],
        history: &[Turn],
    ) -> PromptEnvelope {
        PromptEnvelope {
            context: retrieved.iter().map(|r| r.chunk.text.clone()).collect(),
            history: history.to_vec(),
            question: question.to_string(),
        }
    }
}
