// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod chunk;
pub mod document;

pub use answer::{AnswerMode, Passage, QueryResponse};
pub use chunk::{Chunk, ChunkRecord};
pub use document::Document;
