// file: src/models/answer.rs
// description: query response models with similarity scores
// reference: used for retrieval and answer synthesis results

use serde::{Deserialize, Serialize};

/// A cited passage returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Chunk ID the passage was resolved from
    pub chunk_id: String,

    /// Source document path for citation
    pub source_path: String,

    /// Passage text
    pub text: String,

    /// Cosine similarity against the query (higher is more similar)
    pub score: f32,
}

impl Passage {
    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = if self.text.chars().count() > max_content_len {
            let truncated: String = self.text.chars().take(max_content_len).collect();
            format!("{}...", truncated)
        } else {
            self.text.clone()
        };

        format!(
            "Score: {:.4} | {}\n{}\n",
            self.score, self.source_path, content_preview
        )
    }
}

/// Whether the answer text came from the synthesis collaborator or is the
/// retrieved passages themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerMode {
    Synthesized,
    RetrievalOnly,
}

/// Final result of a query: an answer plus its cited sources, ordered by
/// non-increasing score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Passage>,
    pub mode: AnswerMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_passage() -> Passage {
        Passage {
            chunk_id: "abc123_000".to_string(),
            source_path: "docs/security.txt".to_string(),
            text: "This is a very long passage that will be truncated".to_string(),
            score: 0.87,
        }
    }

    #[test]
    fn test_format_summary_truncates() {
        let summary = sample_passage().format_summary(20);
        assert!(summary.contains("0.8700"));
        assert!(summary.contains("docs/security.txt"));
        assert!(summary.contains("..."));
    }

    #[test]
    fn test_mode_serialization() {
        let synthesized = serde_json::to_string(&AnswerMode::Synthesized).unwrap();
        let retrieval = serde_json::to_string(&AnswerMode::RetrievalOnly).unwrap();
        assert_eq!(synthesized, "\"synthesized\"");
        assert_eq!(retrieval, "\"retrieval-only\"");
    }
}
