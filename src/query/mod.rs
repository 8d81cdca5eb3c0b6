// file: src/query/mod.rs
// description: query engine and answer synthesis module exports
// reference: internal module structure

pub mod engine;
pub mod synthesis;

pub use engine::QueryEngine;
pub use synthesis::{SynthesisClient, SynthesisError};
