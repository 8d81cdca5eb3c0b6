// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{AssistantError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub index: IndexConfig,
    pub query: QueryConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    pub input_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub parallel_workers: usize,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub snapshot_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    pub top_k: usize,
    pub max_prompt_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FAQ_ASSISTANT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            corpus: CorpusConfig {
                input_dir: PathBuf::from("./raw_docs"),
                chunk_size: 500,
                chunk_overlap: 50,
                parallel_workers: 4,
                max_file_size_mb: 10,
            },
            index: IndexConfig {
                snapshot_dir: PathBuf::from("./data/snapshot"),
            },
            query: QueryConfig {
                top_k: 3,
                max_prompt_chars: 6000,
            },
            synthesis: SynthesisConfig {
                api_key: None,
                endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                model: "openai/gpt-oss-120b".to_string(),
                timeout_secs: 30,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.corpus.parallel_workers == 0 {
            return Err(AssistantError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.corpus.chunk_size == 0 {
            return Err(AssistantError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.corpus.chunk_overlap >= self.corpus.chunk_size {
            return Err(AssistantError::Config(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }

        if self.query.top_k == 0 {
            return Err(AssistantError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.synthesis.timeout_secs == 0 {
            return Err(AssistantError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.query.top_k, 3);
        assert_eq!(config.corpus.chunk_size, 500);
    }

    #[test]
    fn test_overlap_must_stay_below_chunk_size() {
        let mut config = Config::default_config();
        config.corpus.chunk_overlap = config.corpus.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default_config();
        config.corpus.parallel_workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = Config::default_config();
        config.query.top_k = 0;
        assert!(config.validate().is_err());
    }
}
