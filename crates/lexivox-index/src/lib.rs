//! Lexivox index crate - chunking, embedding, vector index, and build pipeline.
//!
//! Provides character-window text chunking, an embedding service trait with a
//! hosted OpenAI implementation and a deterministic mock, an in-memory vector
//! index with brute-force cosine search and JSON persistence, and the offline
//! pipeline that turns document text into a persisted index.

pub mod chunk;
pub mod embedding;
pub mod index;
pub mod pipeline;

pub use chunk::split_text;
pub use embedding::{EmbeddingService, MockEmbedding, OpenAiEmbedding};
pub use index::VectorIndex;
pub use pipeline::IndexBuilder;
