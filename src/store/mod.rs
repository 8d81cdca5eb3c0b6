// file: src/store/mod.rs
// description: snapshot persistence module exports
// reference: internal module structure

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotCell, SnapshotStore};
