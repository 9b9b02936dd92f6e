//! In-memory vector index with brute-force cosine similarity search.
//!
//! Chunks are stored in insertion order, which doubles as the tie-break for
//! equal similarity scores. The index is built once (offline) and treated as
//! read-only afterwards; concurrent sessions share it behind an `Arc`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use lexivox_core::error::{LexivoxError, Result};
use lexivox_core::types::{Chunk, RetrievalResult};

/// On-disk format version. Bumped when the persisted layout changes.
const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    chunks: Vec<Chunk>,
}

/// Chunk record persisted alongside the index for human inspection,
/// without the embedding vectors.
#[derive(Serialize, Deserialize)]
struct ChunkRecord {
    text: String,
    source_id: String,
    locator: String,
}

/// Read-only vector index over embedded chunks.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Build an index from embedded chunks.
    ///
    /// All embeddings must be non-empty and share one dimensionality.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self> {
        if let Some(first) = chunks.first() {
            let dim = first.embedding.len();
            if dim == 0 {
                return Err(LexivoxError::Index("Chunk with empty embedding".to_string()));
            }
            for (i, chunk) in chunks.iter().enumerate() {
                if chunk.embedding.len() != dim {
                    return Err(LexivoxError::Index(format!(
                        "Chunk {} has dimension {}, expected {}",
                        i,
                        chunk.embedding.len(),
                        dim
                    )));
                }
            }
        }
        Ok(Self { chunks })
    }

    /// Search for the `k` nearest chunks to the query vector by cosine
    /// similarity.
    ///
    /// Results are sorted by descending score; equal scores keep the chunks'
    /// insertion order. Returns fewer than `k` results (possibly zero) when
    /// the index is small or empty — that is valid output, not an error.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<RetrievalResult> {
        let mut scored: Vec<RetrievalResult> = self
            .chunks
            .iter()
            .map(|chunk| RetrievalResult {
                chunk: chunk.clone(),
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        // Stable sort: insertion order survives for equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Return the number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Return true if the index contains no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All chunks in insertion order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Persist the index under `dir` as `<name>.index.json`, plus a
    /// `<name>.chunks.json` record of the chunk texts for inspection.
    pub fn save(&self, dir: &Path, name: &str) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let file = IndexFile {
            version: INDEX_FORMAT_VERSION,
            chunks: self.chunks.clone(),
        };
        let index_path = dir.join(format!("{}.index.json", name));
        std::fs::write(&index_path, serde_json::to_vec(&file)?)?;

        let records: Vec<ChunkRecord> = self
            .chunks
            .iter()
            .map(|c| ChunkRecord {
                text: c.text.clone(),
                source_id: c.source_id.clone(),
                locator: c.locator.clone(),
            })
            .collect();
        let chunks_path = dir.join(format!("{}.chunks.json", name));
        std::fs::write(&chunks_path, serde_json::to_vec_pretty(&records)?)?;

        info!(
            chunks = self.chunks.len(),
            path = %index_path.display(),
            "Index saved"
        );
        Ok(())
    }

    /// Load a persisted index by name.
    ///
    /// The loader deserializes whatever the file contains; a tampered file
    /// can produce an index full of attacker-chosen text that ends up in
    /// prompts verbatim. Callers must acknowledge this by passing
    /// `allow_untrusted: true` and should only load files they produced.
    pub fn load(dir: &Path, name: &str, allow_untrusted: bool) -> Result<Self> {
        if !allow_untrusted {
            return Err(LexivoxError::Index(
                "Refusing to deserialize index file without allow_untrusted; \
                 only load files you built yourself"
                    .to_string(),
            ));
        }

        let index_path = dir.join(format!("{}.index.json", name));
        let bytes = std::fs::read(&index_path).map_err(|e| {
            LexivoxError::Index(format!("Cannot read {}: {}", index_path.display(), e))
        })?;
        let file: IndexFile = serde_json::from_slice(&bytes)
            .map_err(|e| LexivoxError::Index(format!("Corrupt index file: {}", e)))?;

        if file.version != INDEX_FORMAT_VERSION {
            return Err(LexivoxError::Index(format!(
                "Unsupported index format version {} (expected {})",
                file.version, INDEX_FORMAT_VERSION
            )));
        }

        info!(
            chunks = file.chunks.len(),
            path = %index_path.display(),
            "Index loaded"
        );
        Self::from_chunks(file.chunks)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chunk(text: &str, locator: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            text: text.to_string(),
            source_id: "ppc.pdf".to_string(),
            locator: locator.to_string(),
            embedding,
        }
    }

    #[test]
    fn test_search_ordering() {
        let index = VectorIndex::from_chunks(vec![
            make_chunk("far", "1", vec![-1.0, 0.0]),
            make_chunk("close", "2", vec![1.0, 0.0]),
        ])
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.text, "close");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_search_ties_keep_insertion_order() {
        // Identical embeddings produce identical scores; insertion order
        // must break the tie.
        let index = VectorIndex::from_chunks(vec![
            make_chunk("first", "1", vec![1.0, 0.0]),
            make_chunk("second", "2", vec![1.0, 0.0]),
            make_chunk("third", "3", vec![1.0, 0.0]),
        ])
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 3);
        assert_eq!(hits[0].chunk.text, "first");
        assert_eq!(hits[1].chunk.text, "second");
        assert_eq!(hits[2].chunk.text, "third");
    }

    #[test]
    fn test_search_respects_k_limit() {
        let chunks: Vec<Chunk> = (0..10)
            .map(|i| make_chunk(&format!("c{}", i), &i.to_string(), vec![1.0, 0.0]))
            .collect();
        let index = VectorIndex::from_chunks(chunks).unwrap();
        assert_eq!(index.search(&[1.0, 0.0], 3).len(), 3);
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::default();
        assert!(index.search(&[1.0, 0.0], 5).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_fewer_than_k() {
        let index =
            VectorIndex::from_chunks(vec![make_chunk("only", "1", vec![1.0, 0.0])]).unwrap();
        let hits = index.search(&[1.0, 0.0], 5);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_from_chunks_rejects_mixed_dimensions() {
        let result = VectorIndex::from_chunks(vec![
            make_chunk("a", "1", vec![1.0, 0.0]),
            make_chunk("b", "2", vec![1.0, 0.0, 0.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_chunks_rejects_empty_embedding() {
        let result = VectorIndex::from_chunks(vec![make_chunk("a", "1", vec![])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::from_chunks(vec![
            make_chunk("Section 302: Punishment of qatl-i-amd", "45", vec![1.0, 0.0]),
            make_chunk("Section 378: Theft", "88", vec![0.0, 1.0]),
        ])
        .unwrap();

        index.save(dir.path(), "index").unwrap();
        let loaded = VectorIndex::load(dir.path(), "index", true).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.chunks()[0].locator, "45");
        assert_eq!(loaded.chunks()[1].text, "Section 378: Theft");
    }

    #[test]
    fn test_save_writes_inspection_record() {
        let dir = tempfile::tempdir().unwrap();
        let index =
            VectorIndex::from_chunks(vec![make_chunk("inspect me", "1", vec![1.0])]).unwrap();
        index.save(dir.path(), "index").unwrap();

        let record = std::fs::read_to_string(dir.path().join("index.chunks.json")).unwrap();
        assert!(record.contains("inspect me"));
        // Embeddings stay out of the human-readable record.
        assert!(!record.contains("embedding"));
    }

    #[test]
    fn test_load_requires_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let index =
            VectorIndex::from_chunks(vec![make_chunk("a", "1", vec![1.0])]).unwrap();
        index.save(dir.path(), "index").unwrap();

        let result = VectorIndex::load(dir.path(), "index", false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("allow_untrusted"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VectorIndex::load(dir.path(), "missing", true).is_err());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.index.json"), b"{ not json").unwrap();
        assert!(VectorIndex::load(dir.path(), "bad", true).is_err());
    }

    #[test]
    fn test_load_wrong_version() {
        let dir = tempfile::tempdir().unwrap();
        let payload = serde_json::json!({ "version": 99, "chunks": [] });
        std::fs::write(
            dir.path().join("v99.index.json"),
            serde_json::to_vec(&payload).unwrap(),
        )
        .unwrap();
        let err = VectorIndex::load(dir.path(), "v99", true).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0f32; 100];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let mut a = vec![0.0f32; 100];
        let mut b = vec![0.0f32; 100];
        a[0] = 1.0;
        b[1] = 1.0;
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
    }
}
