// file: src/corpus/loader.rs
// description: Directory walking and plain-text document loading with filtering
// reference: https://docs.rs/walkdir

use crate::config::CorpusConfig;
use crate::error::{AssistantError, Result};
use crate::models::Document;
use crate::utils::Validator;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub struct CorpusLoader {
    config: CorpusConfig,
}

impl CorpusLoader {
    pub fn new(config: CorpusConfig) -> Self {
        Self { config }
    }

    /// Load every readable plain-text file under `root` as one Document per
    /// file. Unreadable, non-UTF-8, oversized, and empty files are skipped
    /// with a warning; the batch continues. Files are visited in sorted path
    /// order so repeated ingestions of the same corpus are identical.
    pub fn load_documents(&self, root: &Path) -> Result<Vec<Document>> {
        Validator::validate_directory(root)?;

        info!("Scanning directory: {}", root.display());
        let mut documents = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if !Self::is_text_file(path) {
                debug!("Skipping non-text file: {}", path.display());
                continue;
            }

            match self.read_document(root, path) {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Skipping document: {}", e),
            }
        }

        info!("Loaded {} text documents", documents.len());
        Ok(documents)
    }

    /// Read one file into a Document. Oversized, unreadable (including
    /// non-UTF-8), and empty files are ingestion errors; the batch loop
    /// above downgrades them to warnings.
    fn read_document(&self, root: &Path, path: &Path) -> Result<Document> {
        let max_size = (self.config.max_file_size_mb * 1024 * 1024) as u64;
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.len() > max_size {
                return Err(AssistantError::Ingestion {
                    path: path.to_path_buf(),
                    message: format!(
                        "file is {} MB, larger than the {} MB limit",
                        metadata.len() / 1024 / 1024,
                        self.config.max_file_size_mb
                    ),
                });
            }
        }

        let raw_text = fs::read_to_string(path).map_err(|e| AssistantError::Ingestion {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if raw_text.trim().is_empty() {
            return Err(AssistantError::Ingestion {
                path: path.to_path_buf(),
                message: "document is empty".to_string(),
            });
        }

        let source_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(Document::new(source_path, raw_text))
    }

    fn is_text_file(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("text")
        )
    }
}
