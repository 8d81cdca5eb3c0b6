// file: src/vectorizer/tfidf.rs
// description: TF-IDF vocabulary model fitting and text-to-vector transforms
// reference: term frequency x smoothed inverse document frequency weighting

use crate::error::{AssistantError, Result};
use crate::models::Chunk;
use crate::vectorizer::tokenize::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Frozen vocabulary learned from the full corpus: a term-to-column mapping
/// and one smoothed IDF weight per column. Built once by `fit` and read-only
/// afterwards; `transform` never mutates it and is safe to call concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyModel {
    vocabulary: HashMap<String, usize>,
    weights: Vec<f32>,
}

impl VocabularyModel {
    /// Learn the vocabulary and per-term weights from every chunk in the
    /// corpus. Columns are assigned in sorted term order so fitting the same
    /// corpus always produces the same model. Fails when the corpus is empty
    /// or when stop-word removal leaves no terms at all.
    pub fn fit(chunks: &[Chunk]) -> Result<Self> {
        if chunks.is_empty() {
            return Err(AssistantError::Fit(
                "corpus contains no chunks".to_string(),
            ));
        }

        let mut doc_frequency: HashMap<String, usize> = HashMap::new();

        for chunk in chunks {
            let mut seen: HashSet<String> = HashSet::new();
            for token in tokenize(&chunk.text) {
                if seen.insert(token.clone()) {
                    *doc_frequency.entry(token).or_insert(0) += 1;
                }
            }
        }

        if doc_frequency.is_empty() {
            return Err(AssistantError::Fit(
                "no extractable terms after tokenization and stop-word removal".to_string(),
            ));
        }

        let mut terms: Vec<String> = doc_frequency.keys().cloned().collect();
        terms.sort();

        let chunk_count = chunks.len() as f32;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut weights = Vec::with_capacity(terms.len());

        for (column, term) in terms.into_iter().enumerate() {
            let df = doc_frequency[&term] as f32;
            // smoothed idf: ln((1 + n) / (1 + df)) + 1
            let idf = ((1.0 + chunk_count) / (1.0 + df)).ln() + 1.0;
            weights.push(idf);
            vocabulary.insert(term, column);
        }

        info!(
            "Fitted vocabulary: {} terms over {} chunks",
            weights.len(),
            chunks.len()
        );

        Ok(Self { vocabulary, weights })
    }

    /// A zero-dimension model, used when the corpus produced no chunks at
    /// all. Every transform yields an empty vector.
    pub fn empty() -> Self {
        Self {
            vocabulary: HashMap::new(),
            weights: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Convert text into an L2-normalized vector in this vocabulary's space.
    /// Terms absent from the vocabulary contribute zero; that is the expected
    /// case for query words the corpus never used.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.weights.len()];

        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                vector[column] += self.weights[column];
            }
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(idx: usize, text: &str) -> Chunk {
        Chunk::new("doc", idx, text.to_string())
    }

    fn sample_corpus() -> Vec<Chunk> {
        vec![
            chunk(0, "Security controls protect workloads from threats"),
            chunk(1, "Cost optimization helps you avoid unnecessary costs"),
            chunk(2, "Performance efficiency uses resources efficiently"),
        ]
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let err = VocabularyModel::fit(&[]).unwrap_err();
        assert!(matches!(err, AssistantError::Fit(_)));
    }

    #[test]
    fn test_fit_rejects_degenerate_corpus() {
        let chunks = vec![chunk(0, "the of and"), chunk(1, "to in on")];
        let err = VocabularyModel::fit(&chunks).unwrap_err();
        assert!(matches!(err, AssistantError::Fit(_)));
    }

    #[test]
    fn test_dimension_is_constant_across_transforms() {
        let model = VocabularyModel::fit(&sample_corpus()).unwrap();

        let a = model.transform("security threats");
        let b = model.transform("completely unrelated wording");
        assert_eq!(a.len(), model.dimension());
        assert_eq!(b.len(), model.dimension());
    }

    #[test]
    fn test_transform_is_deterministic() {
        let model = VocabularyModel::fit(&sample_corpus()).unwrap();

        let first = model.transform("How do I reduce cost?");
        let second = model.transform("How do I reduce cost?");
        assert_eq!(first, second);
    }

    #[test]
    fn test_transform_is_normalized() {
        let model = VocabularyModel::fit(&sample_corpus()).unwrap();

        let vector = model.transform("security controls");
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_terms_contribute_zero() {
        let model = VocabularyModel::fit(&sample_corpus()).unwrap();

        let vector = model.transform("zebra quasar xylophone");
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rare_terms_outweigh_common_terms() {
        let chunks = vec![
            chunk(0, "framework security hardening"),
            chunk(1, "framework cost planning"),
            chunk(2, "framework performance tuning"),
        ];
        let model = VocabularyModel::fit(&chunks).unwrap();

        // "framework" appears in every chunk, "security" in one
        let common = model.vocabulary["framework"];
        let rare = model.vocabulary["security"];
        assert!(model.weights[rare] > model.weights[common]);
    }

    #[test]
    fn test_empty_model_transforms_to_empty_vector() {
        let model = VocabularyModel::empty();
        assert_eq!(model.dimension(), 0);
        assert!(model.transform("anything at all").is_empty());
    }
}
