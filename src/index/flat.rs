// file: src/index/flat.rs
// description: exact flat nearest-neighbor index over normalized vectors
// reference: inner-product search, cosine similarity via L2-normalized rows

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

/// One indexed chunk vector. Position within the index matches the chunk's
/// position in the persisted metadata, which ascends with document order and
/// chunk order_index.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk_id: String,
    vector: Vec<f32>,
}

/// A search hit: the chunk, its cosine score against the query, and its
/// position in the index for metadata resolution.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub score: f32,
    pub position: usize,
}

/// Exact flat index: every query is compared against every entry by inner
/// product. Immutable once built; re-ingestion replaces the whole index.
/// An approximate structure can stand in later behind the same `search`
/// contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn build(vectors: Vec<(String, Vec<f32>)>) -> Self {
        let entries = vectors
            .into_iter()
            .map(|(chunk_id, vector)| IndexEntry { chunk_id, vector })
            .collect::<Vec<_>>();

        info!("Built flat vector index with {} entries", entries.len());
        Self { entries }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimension of the indexed entries, if any exist.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.vector.len())
    }

    pub fn chunk_id_at(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|entry| entry.chunk_id.as_str())
    }

    /// Return the `min(k, entry_count)` most similar entries, sorted by
    /// score descending; equal scores break toward the earlier index
    /// position so results are deterministic. `k == 0` is rejected, as is a
    /// query vector whose dimension does not match the indexed entries.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(AssistantError::QueryValidation(
                "k must be greater than 0".to_string(),
            ));
        }

        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dimension) = self.dimension() {
            if query.len() != dimension {
                return Err(AssistantError::QueryValidation(format!(
                    "query vector dimension {} does not match index dimension {}",
                    query.len(),
                    dimension
                )));
            }
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| ScoredChunk {
                chunk_id: entry.chunk_id.clone(),
                score: dot(query, &entry.vector),
                position,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });

        scored.truncate(k.min(self.entries.len()));
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> VectorIndex {
        VectorIndex::build(vec![
            ("chunk_a".to_string(), vec![1.0, 0.0, 0.0]),
            ("chunk_b".to_string(), vec![0.0, 1.0, 0.0]),
            ("chunk_c".to_string(), vec![0.0, 0.0, 1.0]),
        ])
    }

    #[test]
    fn test_scores_non_increasing() {
        let index = sample_index();
        let results = index.search(&[0.8, 0.6, 0.0], 3).unwrap();

        for window in results.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        assert_eq!(results[0].chunk_id, "chunk_a");
    }

    #[test]
    fn test_k_zero_rejected() {
        let index = sample_index();
        let err = index.search(&[1.0, 0.0, 0.0], 0).unwrap_err();
        assert!(matches!(err, AssistantError::QueryValidation(_)));
    }

    #[test]
    fn test_k_larger_than_corpus_returns_each_entry_once() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0, 0.0], 100).unwrap();

        assert_eq!(results.len(), 3);
        let mut ids: Vec<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_ties_break_by_ascending_position() {
        let index = VectorIndex::build(vec![
            ("late".to_string(), vec![0.0, 1.0]),
            ("early".to_string(), vec![0.0, 1.0]),
        ]);
        let results = index.search(&[0.0, 1.0], 2).unwrap();

        assert_eq!(results[0].chunk_id, "late");
        assert_eq!(results[0].position, 0);
        assert_eq!(results[1].chunk_id, "early");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let index = sample_index();
        let err = index.search(&[1.0, 0.0], 2).unwrap_err();
        assert!(matches!(err, AssistantError::QueryValidation(_)));
    }

    #[test]
    fn test_empty_index_returns_no_results() {
        let index = VectorIndex::default();
        let results = index.search(&[], 5).unwrap();
        assert!(results.is_empty());
        assert_eq!(index.entry_count(), 0);
    }
}
