// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod store;
pub mod utils;
pub mod vectorizer;

pub use config::{Config, CorpusConfig, IndexConfig, QueryConfig, SynthesisConfig};
pub use corpus::{Chunker, CorpusLoader};
pub use error::{AssistantError, Result};
pub use index::{ScoredChunk, VectorIndex};
pub use models::{AnswerMode, Chunk, ChunkRecord, Document, Passage, QueryResponse};
pub use pipeline::{IngestionPipeline, PipelineStats, ProgressTracker};
pub use query::{QueryEngine, SynthesisClient, SynthesisError};
pub use store::{Snapshot, SnapshotCell, SnapshotStore};
pub use vectorizer::VocabularyModel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default_config();
        let _snapshot = Snapshot::empty();
    }
}
