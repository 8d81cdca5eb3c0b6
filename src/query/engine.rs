// file: src/query/engine.rs
// description: query orchestration from free text to cited passages and answer
// reference: retrieval with optional degraded-mode answer synthesis

use crate::config::QueryConfig;
use crate::error::{AssistantError, Result};
use crate::models::{AnswerMode, Passage, QueryResponse};
use crate::query::synthesis::SynthesisClient;
use crate::store::Snapshot;
use crate::utils::Validator;
use std::sync::Arc;
use tracing::{debug, warn};

const PASSAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Turns a free-text query into a cited answer against one snapshot
/// generation. The snapshot's vocabulary/index pairing is checked once at
/// construction; per-query work is read-only and lock-free, so one engine
/// may serve concurrent callers.
pub struct QueryEngine {
    snapshot: Arc<Snapshot>,
    synthesizer: Option<SynthesisClient>,
    config: QueryConfig,
}

impl QueryEngine {
    pub fn new(
        snapshot: Arc<Snapshot>,
        synthesizer: Option<SynthesisClient>,
        config: QueryConfig,
    ) -> Result<Self> {
        snapshot.validate()?;

        Ok(Self {
            snapshot,
            synthesizer,
            config,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.snapshot.entry_count()
    }

    /// Retrieve the `k` most relevant passages for a query. Every returned
    /// passage resolves to its source document path.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        Validator::validate_query(query)?;
        Validator::validate_top_k(k)?;

        let query_vector = self.snapshot.vocabulary.transform(query);
        let hits = self.snapshot.index.search(&query_vector, k)?;

        debug!("Query matched {} of {} entries", hits.len(), self.entry_count());

        hits.into_iter()
            .map(|hit| {
                let record = self.snapshot.chunks.get(hit.position).ok_or_else(|| {
                    AssistantError::IndexLoad(format!(
                        "no chunk metadata at position {}",
                        hit.position
                    ))
                })?;

                Ok(Passage {
                    chunk_id: hit.chunk_id,
                    source_path: record.source_path.clone(),
                    text: record.text.clone(),
                    score: hit.score,
                })
            })
            .collect()
    }

    /// Answer a query: retrieve passages, then synthesize an answer when a
    /// collaborator is configured. Any collaborator failure degrades the
    /// result to retrieval-only; it is never surfaced as a query failure.
    pub async fn answer(&self, query: &str, k: Option<usize>) -> Result<QueryResponse> {
        let k = k.unwrap_or(self.config.top_k);
        let sources = self.retrieve(query, k)?;

        if let Some(client) = &self.synthesizer {
            if sources.is_empty() {
                debug!("No passages retrieved; skipping answer synthesis");
            } else {
                match client
                    .synthesize(query, &sources, self.config.max_prompt_chars)
                    .await
                {
                    Ok(answer) => {
                        return Ok(QueryResponse {
                            answer,
                            sources,
                            mode: AnswerMode::Synthesized,
                        });
                    }
                    Err(e) => {
                        warn!("Answer synthesis failed ({}); returning retrieved passages", e);
                    }
                }
            }
        }

        Ok(QueryResponse {
            answer: join_passages(&sources),
            sources,
            mode: AnswerMode::RetrievalOnly,
        })
    }
}

fn join_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PASSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::index::VectorIndex;
    use crate::models::{Chunk, ChunkRecord, Document};
    use crate::vectorizer::VocabularyModel;

    fn topical_snapshot() -> Snapshot {
        let texts = [
            ("security.txt", "Security controls protect workloads from threats"),
            (
                "cost.txt",
                "Cost optimization helps you reduce unnecessary cost and spending",
            ),
            (
                "performance.txt",
                "Performance efficiency uses compute resources efficiently",
            ),
        ];

        let mut chunks = Vec::new();
        let mut records = Vec::new();
        for (path, text) in texts {
            let doc = Document::new(path.to_string(), text.to_string());
            let chunk = Chunk::new(&doc.id, 0, text.to_string());
            records.push(ChunkRecord::from_chunk(&chunk, &doc));
            chunks.push(chunk);
        }

        let vocabulary = VocabularyModel::fit(&chunks).unwrap();
        let vectors = chunks
            .iter()
            .map(|c| (c.id.clone(), vocabulary.transform(&c.text)))
            .collect();

        Snapshot::new(vocabulary, records, VectorIndex::build(vectors)).unwrap()
    }

    fn engine(snapshot: Snapshot, synthesizer: Option<SynthesisClient>) -> QueryEngine {
        let config = Config::default_config().query;
        QueryEngine::new(Arc::new(snapshot), synthesizer, config).unwrap()
    }

    fn unreachable_synthesizer() -> SynthesisClient {
        let mut config = Config::default_config().synthesis;
        config.endpoint = "http://127.0.0.1:9/v1/chat/completions".to_string();
        config.timeout_secs = 1;
        SynthesisClient::new("test-key".to_string(), &config).unwrap()
    }

    #[test]
    fn test_empty_query_rejected() {
        let engine = engine(topical_snapshot(), None);
        assert!(matches!(
            engine.retrieve("", 3),
            Err(AssistantError::QueryValidation(_))
        ));
        assert!(matches!(
            engine.retrieve("   \n ", 3),
            Err(AssistantError::QueryValidation(_))
        ));
    }

    #[test]
    fn test_zero_k_rejected() {
        let engine = engine(topical_snapshot(), None);
        assert!(matches!(
            engine.retrieve("valid question", 0),
            Err(AssistantError::QueryValidation(_))
        ));
    }

    #[test]
    fn test_cost_query_ranks_cost_chunk_first() {
        let engine = engine(topical_snapshot(), None);
        let passages = engine.retrieve("How do I reduce cost?", 3).unwrap();

        assert_eq!(passages.len(), 3);
        assert_eq!(passages[0].source_path, "cost.txt");
        assert!(passages[0].score > passages[1].score);
        assert!(passages[0].score > passages[2].score);
    }

    #[test]
    fn test_every_passage_carries_a_source() {
        let engine = engine(topical_snapshot(), None);
        let passages = engine.retrieve("security threats", 3).unwrap();

        assert!(!passages.is_empty());
        for passage in &passages {
            assert!(!passage.source_path.is_empty());
            assert!(!passage.text.is_empty());
        }
    }

    #[tokio::test]
    async fn test_empty_index_returns_empty_sources() {
        let engine = engine(Snapshot::empty(), None);
        let response = engine.answer("anything?", None).await.unwrap();

        assert!(response.sources.is_empty());
        assert!(response.answer.is_empty());
        assert_eq!(response.mode, AnswerMode::RetrievalOnly);
    }

    #[tokio::test]
    async fn test_no_synthesizer_yields_retrieval_only() {
        let engine = engine(topical_snapshot(), None);
        let response = engine.answer("How do I reduce cost?", None).await.unwrap();

        assert_eq!(response.mode, AnswerMode::RetrievalOnly);
        assert_eq!(response.sources.len(), 3);
        assert!(response.answer.contains("Cost optimization"));
    }

    #[tokio::test]
    async fn test_unreachable_synthesizer_degrades_to_retrieval_only() {
        let engine = engine(topical_snapshot(), Some(unreachable_synthesizer()));
        let response = engine.answer("How do I reduce cost?", None).await.unwrap();

        assert_eq!(response.mode, AnswerMode::RetrievalOnly);
        assert_eq!(response.sources.len(), 3);
        assert_eq!(response.sources[0].source_path, "cost.txt");
    }

    #[tokio::test]
    async fn test_k_override_limits_sources() {
        let engine = engine(topical_snapshot(), None);
        let response = engine.answer("reduce cost", Some(1)).await.unwrap();
        assert_eq!(response.sources.len(), 1);
    }
}
