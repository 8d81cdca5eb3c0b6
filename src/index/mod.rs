// file: src/index/mod.rs
// description: vector index module exports
// reference: internal module structure

pub mod flat;

pub use flat::{ScoredChunk, VectorIndex};
