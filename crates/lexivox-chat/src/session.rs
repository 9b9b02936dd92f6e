//! Per-caller conversation sessions.
//!
//! A session owns a retrieval index handle and the conversation memory for
//! one caller. At most one question may be in flight at a time: the memory
//! mutex is held for the full duration of a turn, and a second concurrent
//! question is rejected rather than queued.

use std::path::Path;
use std::sync::Arc;

use lexivox_index::VectorIndex;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::error::ChatError;
use crate::memory::{ConversationMemory, Turn};

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    index: Arc<VectorIndex>,
    memory: Mutex<ConversationMemory>,
}

impl Session {
    /// Create a session over an already loaded index.
    pub fn new(index: Arc<VectorIndex>, memory_cap: usize) -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, chunks = index.len(), "Session created");
        Self {
            id,
            index,
            memory: Mutex::new(ConversationMemory::new(memory_cap)),
        }
    }

    /// Load a persisted index and open a session over it.
    ///
    /// The caller must pass `allow_untrusted = true` to acknowledge that the
    /// index file is deserialized without provenance checks. Any load error
    /// surfaces as [`ChatError::IndexLoadFailure`].
    pub fn open(
        dir: impl AsRef<Path>,
        name: &str,
        allow_untrusted: bool,
        memory_cap: usize,
    ) -> Result<Self, ChatError> {
        let index = VectorIndex::load(dir.as_ref(), name, allow_untrusted)
            .map_err(|e| ChatError::IndexLoadFailure(e.to_string()))?;
        Ok(Self::new(Arc::new(index), memory_cap))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Acquire the session for one question, or fail with `SessionBusy` if
    /// another question is already in flight. The returned guard holds the
    /// session until dropped.
    pub fn try_begin(&self) -> Result<MutexGuard<'_, ConversationMemory>, ChatError> {
        self.memory.try_lock().map_err(|_| ChatError::SessionBusy)
    }

    /// Snapshot of the conversation so far, oldest turn first.
    pub async fn history(&self) -> Vec<Turn> {
        self.memory.lock().await.render().to_vec()
    }

    /// Clear the conversation memory. Waits for any in-flight question.
    pub async fn reset(&self) {
        self.memory.lock().await.reset();
        info!(session_id = %self.id, "Session memory reset");
    }
}
