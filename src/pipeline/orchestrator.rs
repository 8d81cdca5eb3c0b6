// file: src/pipeline/orchestrator.rs
// description: coordinates corpus loading, chunking, vectorization, and snapshot persistence
// reference: orchestrates asynchronous ingestion workflow

use crate::config::Config;
use crate::corpus::{Chunker, CorpusLoader};
use crate::error::{AssistantError, Result};
use crate::index::VectorIndex;
use crate::models::{Chunk, ChunkRecord, Document};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::store::{Snapshot, SnapshotStore};
use crate::utils::OperationTimer;
use crate::vectorizer::VocabularyModel;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One-shot batch ingestion: load documents, chunk them in parallel, fit the
/// vocabulary over the merged corpus, vectorize, build the flat index, and
/// persist the snapshot. Re-running replaces the snapshot wholesale.
pub struct IngestionPipeline {
    config: Config,
    chunker: Arc<Chunker>,
    store: SnapshotStore,
}

impl IngestionPipeline {
    pub fn new(config: Config) -> Result<Self> {
        let chunker = Arc::new(Chunker::new(
            config.corpus.chunk_size,
            config.corpus.chunk_overlap,
        )?);
        let store = SnapshotStore::new(config.index.snapshot_dir.clone());

        Ok(Self {
            config,
            chunker,
            store,
        })
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub async fn run(&self, limit: Option<usize>) -> Result<PipelineStats> {
        info!("Starting corpus ingestion pipeline");
        let timer = OperationTimer::new("ingest");

        let documents = self.load_documents().await?;

        let documents: Vec<Document> = match limit {
            Some(n) => documents.into_iter().take(n).collect(),
            None => documents,
        };

        if documents.is_empty() {
            warn!(
                "No documents found under {}; writing an empty snapshot",
                self.config.corpus.input_dir.display()
            );
        }

        let progress = Arc::new(ProgressTracker::new(documents.len()));

        info!(
            "Chunking {} documents with {} workers",
            documents.len(),
            self.config.corpus.parallel_workers
        );
        let chunked = self.chunk_documents(documents, progress.clone()).await;

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut records: Vec<ChunkRecord> = Vec::new();
        for (document, doc_chunks) in &chunked {
            for chunk in doc_chunks {
                records.push(ChunkRecord::from_chunk(chunk, document));
                chunks.push(chunk.clone());
            }
        }

        let snapshot = if chunks.is_empty() {
            warn!("Corpus produced no chunks; queries will return empty results");
            Snapshot::empty()
        } else {
            timer.checkpoint("fitting vocabulary");
            progress.set_message("Fitting vocabulary".to_string());
            let vocabulary = VocabularyModel::fit(&chunks)?;

            timer.checkpoint("vectorizing chunks");
            progress.set_message("Vectorizing chunks".to_string());
            let vectors = chunks
                .iter()
                .map(|chunk| (chunk.id.clone(), vocabulary.transform(&chunk.text)))
                .collect();

            Snapshot::new(vocabulary, records, VectorIndex::build(vectors))?
        };

        self.store.save(&snapshot)?;

        let mut stats = progress.get_stats();
        stats.vocabulary_size = snapshot.vocabulary.dimension();
        progress.finish();
        timer.finish_with_count(stats.chunks_created);

        self.log_final_stats(&stats);

        Ok(stats)
    }

    async fn load_documents(&self) -> Result<Vec<Document>> {
        let corpus_config = self.config.corpus.clone();
        let input_dir = self.config.corpus.input_dir.clone();

        tokio::task::spawn_blocking(move || {
            let loader = CorpusLoader::new(corpus_config);
            loader.load_documents(&input_dir)
        })
        .await
        .map_err(|e| AssistantError::Validation(format!("Document loading task failed: {}", e)))?
    }

    /// Chunk each document on a blocking worker, bounded by the configured
    /// parallelism, then merge results back into document order so the
    /// downstream fit and index are deterministic.
    async fn chunk_documents(
        &self,
        documents: Vec<Document>,
        progress: Arc<ProgressTracker>,
    ) -> Vec<(Document, Vec<Chunk>)> {
        let workers = self.config.corpus.parallel_workers.max(1);
        let chunker = Arc::clone(&self.chunker);

        let tasks = documents.into_iter().enumerate().map(|(position, document)| {
            let chunker = Arc::clone(&chunker);
            let progress = Arc::clone(&progress);

            async move {
                let split = tokio::task::spawn_blocking({
                    let chunker = Arc::clone(&chunker);
                    let document = document.clone();
                    move || chunker.split(&document)
                })
                .await;

                match split {
                    Ok(chunks) if chunks.is_empty() => {
                        progress.inc_documents_skipped();
                        warn!("Document {} produced no chunks", document.source_path);
                        None
                    }
                    Ok(chunks) => {
                        progress.inc_documents_loaded();
                        progress.add_chunks(chunks.len());
                        progress.add_bytes_processed(document.raw_text.len() as u64);
                        Some((position, document, chunks))
                    }
                    Err(e) => {
                        progress.inc_documents_skipped();
                        error!("Chunking task panicked for {}: {}", document.source_path, e);
                        None
                    }
                }
            }
        });

        let mut chunked: Vec<(usize, Document, Vec<Chunk>)> = stream::iter(tasks)
            .buffer_unordered(workers)
            .filter_map(|result| async move { result })
            .collect()
            .await;

        chunked.sort_by_key(|(position, _, _)| *position);
        chunked
            .into_iter()
            .map(|(_, document, chunks)| (document, chunks))
            .collect()
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Ingestion Summary ===");
        info!("Duration: {} seconds", stats.duration_secs);
        info!("Documents ingested: {}", stats.documents_loaded);
        info!("Documents skipped: {}", stats.documents_skipped);
        info!("Chunks created: {}", stats.chunks_created);
        info!("Vocabulary size: {}", stats.vocabulary_size);
        info!(
            "Throughput: {:.2} MB/sec",
            stats.bytes_per_second() / 1_048_576.0
        );
        info!("=========================");
    }
}
