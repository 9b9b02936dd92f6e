//! Bounded conversation memory.
//!
//! An ordered, append-only log of question/answer turns owned by one
//! session. The cap bounds prompt growth: once full, the oldest turn is
//! evicted first-in-first-out. Turns are never edited after creation.

use tracing::debug;

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    /// Logical timestamp, strictly increasing per memory. Survives eviction
    /// and reset so turn identity stays unambiguous across the session.
    pub timestamp: u64,
}

/// Ordered log of turns with FIFO eviction at the cap.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
    cap: usize,
    next_timestamp: u64,
}

impl ConversationMemory {
    /// Create an empty memory retaining at most `cap` turns.
    ///
    /// A cap of zero retains nothing: every turn is dropped immediately and
    /// prompts carry no history.
    pub fn new(cap: usize) -> Self {
        Self {
            turns: Vec::new(),
            cap,
            next_timestamp: 0,
        }
    }

    /// Append a turn, evicting the oldest one if the cap is reached.
    pub fn append(&mut self, question: &str, answer: &str) {
        let timestamp = self.next_timestamp;
        self.next_timestamp += 1;

        if self.cap == 0 {
            return;
        }

        if self.turns.len() == self.cap {
            let evicted = self.turns.remove(0);
            debug!(timestamp = evicted.timestamp, "Evicted oldest turn");
        }

        self.turns.push(Turn {
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp,
        });
    }

    /// Turns oldest-to-newest.
    pub fn render(&self) -> &[Turn] {
        &self.turns
    }

    /// Clear all turns. The next `render` returns an empty sequence.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Number of retained turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True if no turns are retained.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The configured cap.
    pub fn cap(&self) -> usize {
        self.cap
    }
}
