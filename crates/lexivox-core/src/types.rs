use serde::{Deserialize, Serialize};

/// An immutable span of source text with its embedding vector.
///
/// Chunks are created once during the offline index build and never mutated
/// afterwards; the loaded index hands out clones for provenance display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Identifier of the source document (file path or URL).
    pub source_id: String,
    /// Position of the chunk within the source: a page number, section
    /// number, or chunk ordinal, rendered as text.
    pub locator: String,
    /// Embedding vector assigned at index-build time.
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Human-readable source label: file name (not the full path) plus the
    /// locator, e.g. `ppc.pdf#45`.
    pub fn source_label(&self) -> String {
        let name = self
            .source_id
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.source_id);
        format!("{}#{}", name, self.locator)
    }
}

/// A single retrieval hit: a chunk plus its similarity score.
///
/// Retrieval calls return results sorted by descending score; ties keep the
/// chunks' original insertion order.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub chunk: Chunk,
    /// Cosine similarity, higher is better.
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chunk(source_id: &str, locator: &str) -> Chunk {
        Chunk {
            text: "Whoever commits theft shall be punished".to_string(),
            source_id: source_id.to_string(),
            locator: locator.to_string(),
            embedding: vec![0.1, 0.2, 0.3],
        }
    }

    #[test]
    fn test_source_label_strips_path() {
        let chunk = make_chunk("/data/statutes/ppc.pdf", "45");
        assert_eq!(chunk.source_label(), "ppc.pdf#45");
    }

    #[test]
    fn test_source_label_windows_path() {
        let chunk = make_chunk("C:\\statutes\\ppc.pdf", "3");
        assert_eq!(chunk.source_label(), "ppc.pdf#3");
    }

    #[test]
    fn test_source_label_bare_name() {
        let chunk = make_chunk("ppc.pdf", "1");
        assert_eq!(chunk.source_label(), "ppc.pdf#1");
    }

    #[test]
    fn test_source_label_trailing_slash() {
        let chunk = make_chunk("statutes/", "2");
        assert_eq!(chunk.source_label(), "statutes/#2");
    }

    #[test]
    fn test_chunk_serde_roundtrip() {
        let chunk = make_chunk("ppc.pdf", "45");
        let json = serde_json::to_string(&chunk).unwrap();
        let back: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chunk);
    }
}
