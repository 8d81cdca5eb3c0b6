// file: src/models/chunk.rs
// description: chunk model and persisted chunk metadata row
// reference: internal data structures

use crate::models::Document;
use serde::{Deserialize, Serialize};

/// A bounded contiguous slice of a document's text, the unit of retrieval.
/// `order_index` is stable within a document and used for citation and
/// search tie-breaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub doc_id: String,
    pub order_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(doc_id: &str, order_index: usize, text: String) -> Self {
        Self {
            id: format!("{}_{:03}", doc_id, order_index),
            doc_id: doc_id.to_string(),
            order_index,
            text,
        }
    }
}

/// Persisted metadata row for one chunk. Positionally aligned with the
/// vector index so a search hit resolves to its text and source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_id: String,
    pub doc_id: String,
    pub source_path: String,
    pub order_index: usize,
    pub text: String,
}

impl ChunkRecord {
    pub fn from_chunk(chunk: &Chunk, document: &Document) -> Self {
        Self {
            chunk_id: chunk.id.clone(),
            doc_id: chunk.doc_id.clone(),
            source_path: document.source_path.clone(),
            order_index: chunk.order_index,
            text: chunk.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_includes_order_index() {
        let chunk = Chunk::new("abc123", 7, "text".to_string());
        assert_eq!(chunk.id, "abc123_007");
        assert_eq!(chunk.order_index, 7);
    }

    #[test]
    fn test_record_carries_source_path() {
        let doc = Document::new("docs/faq.txt".to_string(), "body".to_string());
        let chunk = Chunk::new(&doc.id, 0, "body".to_string());
        let record = ChunkRecord::from_chunk(&chunk, &doc);

        assert_eq!(record.chunk_id, chunk.id);
        assert_eq!(record.doc_id, doc.id);
        assert_eq!(record.source_path, "docs/faq.txt");
    }
}
