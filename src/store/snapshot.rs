// file: src/store/snapshot.rs
// description: snapshot persistence for vocabulary, chunk metadata, and index
// reference: three JSON artifacts loaded back as one immutable generation

use crate::error::{AssistantError, Result};
use crate::index::VectorIndex;
use crate::models::ChunkRecord;
use crate::vectorizer::VocabularyModel;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CHUNKS_FILE: &str = "chunks.json";
pub const INDEX_FILE: &str = "index.json";

/// One serving generation: the vocabulary that produced the index's vectors,
/// the chunk metadata aligned with the index positions, and the index itself.
/// Immutable once constructed; re-ingestion builds a new snapshot and swaps
/// it in whole.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub vocabulary: VocabularyModel,
    pub chunks: Vec<ChunkRecord>,
    pub index: VectorIndex,
}

impl Snapshot {
    pub fn new(
        vocabulary: VocabularyModel,
        chunks: Vec<ChunkRecord>,
        index: VectorIndex,
    ) -> Result<Self> {
        let snapshot = Self {
            vocabulary,
            chunks,
            index,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Snapshot for a corpus that produced nothing: dimension 0, no entries.
    /// Queries against it return empty results rather than failing.
    pub fn empty() -> Self {
        Self {
            vocabulary: VocabularyModel::empty(),
            chunks: Vec::new(),
            index: VectorIndex::default(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.index.entry_count()
    }

    /// Enforce the pairing invariants the query path relies on: metadata and
    /// index are positionally aligned, and the indexed vectors live in the
    /// vocabulary's space.
    pub fn validate(&self) -> Result<()> {
        if self.chunks.len() != self.index.entry_count() {
            return Err(AssistantError::IndexLoad(format!(
                "chunk metadata has {} rows but index has {} entries",
                self.chunks.len(),
                self.index.entry_count()
            )));
        }

        for (position, record) in self.chunks.iter().enumerate() {
            match self.index.chunk_id_at(position) {
                Some(chunk_id) if chunk_id == record.chunk_id => {}
                _ => {
                    return Err(AssistantError::IndexLoad(format!(
                        "chunk metadata and index disagree at position {}",
                        position
                    )));
                }
            }
        }

        if let Some(dimension) = self.index.dimension() {
            if dimension != self.vocabulary.dimension() {
                return Err(AssistantError::IndexLoad(format!(
                    "index vectors have dimension {} but vocabulary has dimension {}",
                    dimension,
                    self.vocabulary.dimension()
                )));
            }
        }

        Ok(())
    }
}

/// Reads and writes snapshot artifacts under a configurable directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_paths(&self) -> [PathBuf; 3] {
        [
            self.dir.join(VECTORIZER_FILE),
            self.dir.join(CHUNKS_FILE),
            self.dir.join(INDEX_FILE),
        ]
    }

    pub fn exists(&self) -> bool {
        self.artifact_paths().iter().all(|path| path.is_file())
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        snapshot.validate()?;
        fs::create_dir_all(&self.dir)?;

        fs::write(
            self.dir.join(VECTORIZER_FILE),
            serde_json::to_string(&snapshot.vocabulary)?,
        )?;
        fs::write(
            self.dir.join(CHUNKS_FILE),
            serde_json::to_string(&snapshot.chunks)?,
        )?;
        fs::write(
            self.dir.join(INDEX_FILE),
            serde_json::to_string(&snapshot.index)?,
        )?;

        info!(
            "Saved snapshot ({} entries) to {}",
            snapshot.entry_count(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load the persisted generation. Missing or corrupt artifacts are fatal
    /// for the query path; the caller should direct the operator to re-ingest.
    pub fn load(&self) -> Result<Snapshot> {
        if !self.exists() {
            return Err(AssistantError::IndexLoad(format!(
                "snapshot not found at {}; run ingest first",
                self.dir.display()
            )));
        }

        let vocabulary: VocabularyModel =
            Self::read_artifact(&self.dir.join(VECTORIZER_FILE))?;
        let chunks: Vec<ChunkRecord> = Self::read_artifact(&self.dir.join(CHUNKS_FILE))?;
        let index: VectorIndex = Self::read_artifact(&self.dir.join(INDEX_FILE))?;

        let snapshot = Snapshot::new(vocabulary, chunks, index)?;
        info!(
            "Loaded snapshot ({} entries) from {}",
            snapshot.entry_count(),
            self.dir.display()
        );
        Ok(snapshot)
    }

    fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AssistantError::IndexLoad(format!("cannot read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            AssistantError::IndexLoad(format!("corrupt artifact {}: {}", path.display(), e))
        })
    }
}

/// Currently published snapshot generation. Queries clone the Arc and run
/// against a consistent triple; re-ingestion stores a fresh snapshot and
/// in-flight queries keep the generation they started with.
pub struct SnapshotCell {
    inner: RwLock<Arc<Snapshot>>,
}

impl SnapshotCell {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn load(&self) -> Arc<Snapshot> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => {
                warn!("Snapshot cell lock poisoned; serving last published generation");
                Arc::clone(&poisoned.into_inner())
            }
        }
    }

    pub fn store(&self, snapshot: Snapshot) {
        let fresh = Arc::new(snapshot);
        match self.inner.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }
}
