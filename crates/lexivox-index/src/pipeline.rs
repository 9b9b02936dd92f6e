//! Offline index build pipeline.
//!
//! Collects document text, splits it into chunks, embeds the chunks in
//! batches, and produces a [`VectorIndex`] ready to persist. This is the
//! counterpart of the live question path: it runs once per statute, not per
//! question.

use std::path::Path;

use tracing::{debug, info};

use lexivox_core::config::IndexConfig;
use lexivox_core::error::Result;
use lexivox_core::types::Chunk;

use crate::chunk::split_text;
use crate::embedding::EmbeddingService;
use crate::index::VectorIndex;

/// A chunk awaiting its embedding.
#[derive(Debug, Clone)]
struct PendingChunk {
    source_id: String,
    locator: String,
    text: String,
}

/// Builder that accumulates document text and produces an embedded index.
pub struct IndexBuilder<E: EmbeddingService> {
    embedder: E,
    chunk_size: usize,
    chunk_overlap: usize,
    batch_size: usize,
    pending: Vec<PendingChunk>,
}

impl<E: EmbeddingService> IndexBuilder<E> {
    /// Create a builder with explicit chunking parameters.
    pub fn new(embedder: E, chunk_size: usize, chunk_overlap: usize, batch_size: usize) -> Self {
        Self {
            embedder,
            chunk_size,
            chunk_overlap,
            batch_size: batch_size.max(1),
            pending: Vec::new(),
        }
    }

    /// Create a builder from the index section of the application config.
    pub fn with_config(embedder: E, config: &IndexConfig) -> Self {
        Self::new(
            embedder,
            config.chunk_size,
            config.chunk_overlap,
            config.embed_batch_size,
        )
    }

    /// Split a whole document into chunks with 1-based ordinal locators.
    pub fn add_document(&mut self, source_id: &str, text: &str) {
        let pieces = split_text(text, self.chunk_size, self.chunk_overlap);
        let count = pieces.len();
        for (i, piece) in pieces.into_iter().enumerate() {
            self.pending.push(PendingChunk {
                source_id: source_id.to_string(),
                locator: (i + 1).to_string(),
                text: piece,
            });
        }
        info!(source_id, chunks = count, "Document chunked");
    }

    /// Add a pre-split passage (e.g. one statute section) with its own
    /// locator. Blank passages are skipped.
    pub fn add_passage(&mut self, source_id: &str, locator: &str, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!(source_id, locator, "Skipping blank passage");
            return;
        }
        // Long passages still respect the chunk budget.
        for piece in split_text(trimmed, self.chunk_size, self.chunk_overlap) {
            self.pending.push(PendingChunk {
                source_id: source_id.to_string(),
                locator: locator.to_string(),
                text: piece,
            });
        }
    }

    /// Number of chunks queued for embedding.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Embed all queued chunks and build the index.
    pub async fn build(self) -> Result<VectorIndex> {
        let total = self.pending.len();
        info!(chunks = total, "Embedding chunks");

        let mut chunks = Vec::with_capacity(total);
        for batch in self.pending.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            for (pending, embedding) in batch.iter().zip(vectors) {
                chunks.push(Chunk {
                    text: pending.text.clone(),
                    source_id: pending.source_id.clone(),
                    locator: pending.locator.clone(),
                    embedding,
                });
            }
        }

        info!(chunks = chunks.len(), "Index built");
        VectorIndex::from_chunks(chunks)
    }

    /// Embed all queued chunks, build the index, and persist it under
    /// `dir` as `name`.
    pub async fn build_and_save(self, dir: &Path, name: &str) -> Result<VectorIndex> {
        let index = self.build().await?;
        index.save(dir, name)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedding;

    fn make_builder() -> IndexBuilder<MockEmbedding> {
        IndexBuilder::new(MockEmbedding::new(), 500, 50, 8)
    }

    #[tokio::test]
    async fn test_build_from_document() {
        let mut builder = make_builder();
        builder.add_document("ppc.pdf", &"statute text about theft. ".repeat(80));
        assert!(builder.pending_count() > 1);

        let index = builder.build().await.unwrap();
        assert!(index.len() > 1);
        assert_eq!(index.chunks()[0].locator, "1");
        assert_eq!(index.chunks()[1].locator, "2");
    }

    #[tokio::test]
    async fn test_build_from_passages_keeps_locators() {
        let mut builder = make_builder();
        builder.add_passage("statute.html", "302", "Punishment of qatl-i-amd.");
        builder.add_passage("statute.html", "378", "Theft defined.");

        let index = builder.build().await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.chunks()[0].locator, "302");
        assert_eq!(index.chunks()[1].locator, "378");
    }

    #[tokio::test]
    async fn test_blank_passage_skipped() {
        let mut builder = make_builder();
        builder.add_passage("statute.html", "1", "   ");
        assert_eq!(builder.pending_count(), 0);

        let index = builder.build().await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_long_passage_is_split() {
        let mut builder = IndexBuilder::new(MockEmbedding::new(), 100, 10, 8);
        builder.add_passage("statute.html", "9", &"clause ".repeat(60));
        assert!(builder.pending_count() > 1);

        let index = builder.build().await.unwrap();
        // Every piece keeps the section locator.
        for chunk in index.chunks() {
            assert_eq!(chunk.locator, "9");
        }
    }

    #[tokio::test]
    async fn test_build_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = make_builder();
        builder.add_document("ppc.pdf", "Short statute body.");
        builder.build_and_save(dir.path(), "index").await.unwrap();

        let loaded = VectorIndex::load(dir.path(), "index", true).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.chunks()[0].source_id, "ppc.pdf");
    }

    #[tokio::test]
    async fn test_batching_covers_all_chunks() {
        // Batch size smaller than chunk count exercises the batch loop.
        let mut builder = IndexBuilder::new(MockEmbedding::new(), 50, 0, 2);
        builder.add_document("doc", &"several distinct words here ".repeat(20));
        let expected = builder.pending_count();
        assert!(expected > 2);

        let index = builder.build().await.unwrap();
        assert_eq!(index.len(), expected);
    }

    #[tokio::test]
    async fn test_search_finds_related_chunk() {
        let mut builder = make_builder();
        builder.add_passage("ppc.pdf", "45", "Section 302: Punishment of qatl-i-amd");
        builder.add_passage("ppc.pdf", "88", "Section 378: Theft of movable property");
        let index = builder.build().await.unwrap();

        let embedder = MockEmbedding::new();
        let query = embedder
            .embed("Section 302: Punishment of qatl-i-amd")
            .await
            .unwrap();
        let hits = index.search(&query, 1);
        assert_eq!(hits[0].chunk.locator, "45");
    }
}
