// file: src/corpus/chunker.rs
// description: fixed-size overlapping window chunking of document text
// reference: sliding window splitter with character-counted bounds

use crate::error::{AssistantError, Result};
use crate::models::{Chunk, Document};

/// Splits a document into ordered, bounded-size passages. Windows are
/// `chunk_size` Unicode scalar values wide and advance by
/// `chunk_size - chunk_overlap`, so consecutive chunks share `chunk_overlap`
/// characters. Dropping each later chunk's leading overlap and concatenating
/// reconstructs the normalized document text exactly.
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AssistantError::Validation(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if chunk_overlap >= chunk_size {
            return Err(AssistantError::Validation(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split a document into chunks in non-decreasing `order_index`. An
    /// empty or whitespace-only document yields zero chunks; the caller
    /// decides how to report that.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        let text = Self::normalize(&document.raw_text);
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let stride = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut order_index = 0;

        loop {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            chunks.push(Chunk::new(&document.id, order_index, window));

            if end == chars.len() {
                break;
            }

            start += stride;
            order_index += 1;
        }

        chunks
    }

    /// CRLF folded to LF, surrounding whitespace trimmed. This is the text
    /// the reconstruction invariant is stated over.
    pub fn normalize(raw: &str) -> String {
        raw.replace("\r\n", "\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::new("doc_001.txt".to_string(), text.to_string())
    }

    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                out.extend(chunk.text.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_short_document_single_chunk() {
        let chunker = Chunker::new(500, 50).unwrap();
        let chunks = chunker.split(&doc("A short document."));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].order_index, 0);
        assert_eq!(chunks[0].text, "A short document.");
    }

    #[test]
    fn test_windows_never_exceed_chunk_size() {
        let chunker = Chunker::new(10, 3).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let chunks = chunker.split(&doc(text));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 10);
        }
    }

    #[test]
    fn test_order_index_is_non_decreasing() {
        let chunker = Chunker::new(8, 2).unwrap();
        let chunks = chunker.split(&doc("the quick brown fox jumps over the lazy dog"));

        for window in chunks.windows(2) {
            assert!(window[0].order_index < window[1].order_index);
        }
    }

    #[test]
    fn test_deoverlapped_concatenation_reconstructs_text() {
        let chunker = Chunker::new(12, 4).unwrap();
        let text = "Retrieval systems answer questions by ranking passages against a query.";
        let chunks = chunker.split(&doc(text));

        assert_eq!(reconstruct(&chunks, chunker.overlap()), text);
    }

    #[test]
    fn test_reconstruction_with_multibyte_text() {
        let chunker = Chunker::new(7, 2).unwrap();
        let text = "héllo wörld ünïcode chünking tëst";
        let chunks = chunker.split(&doc(text));

        assert_eq!(reconstruct(&chunks, chunker.overlap()), text);
    }

    #[test]
    fn test_whitespace_only_document_yields_zero_chunks() {
        let chunker = Chunker::new(500, 50).unwrap();
        assert!(chunker.split(&doc("   \n\t  ")).is_empty());
    }

    #[test]
    fn test_crlf_normalized() {
        let chunker = Chunker::new(500, 50).unwrap();
        let chunks = chunker.split(&doc("line one\r\nline two"));
        assert_eq!(chunks[0].text, "line one\nline two");
    }

    #[test]
    fn test_invalid_sizing_rejected() {
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(10, 10).is_err());
        assert!(Chunker::new(10, 20).is_err());
    }
}
