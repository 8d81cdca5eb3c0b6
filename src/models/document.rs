// file: src/models/document.rs
// description: core document model with content-hash identity
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single ingested source file. Created once at ingestion and immutable
/// thereafter; the id is the SHA-256 hash of the raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub source_path: String,
    pub raw_text: String,
}

impl Document {
    pub fn new(source_path: String, raw_text: String) -> Self {
        let id = Self::compute_hash(&raw_text);

        Self {
            id,
            source_path,
            raw_text,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new(
            "/path/to/doc_001.txt".to_string(),
            "Plain text content".to_string(),
        );

        assert_eq!(doc.source_path, "/path/to/doc_001.txt");
        assert!(!doc.id.is_empty());
        assert_eq!(doc.raw_text, "Plain text content");
    }

    #[test]
    fn test_hash_consistency() {
        let content = "Test content";
        let hash1 = Document::compute_hash(content);
        let hash2 = Document::compute_hash(content);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_different_content_different_id() {
        let a = Document::new("a.txt".to_string(), "alpha".to_string());
        let b = Document::new("b.txt".to_string(), "beta".to_string());
        assert_ne!(a.id, b.id);
    }
}
