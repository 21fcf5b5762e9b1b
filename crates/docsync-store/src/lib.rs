//! docsync store - file layer
//!
//! Provides:
//! - format-preserving YAML documents (`StructuredDocument`)
//! - the per-run `DocumentStore` with atomic per-file flushes
//! - the `EntityIndex` scan over the project's documentation tree
//! - `docsync.toml` project settings
//! - loaders for the JSON inputs (catalog, foreign keys, model dependencies)

pub mod atomic;
pub mod config;
pub mod document;
pub mod errors;
pub mod index;
pub mod inputs;
pub mod store;

// Re-export key types
pub use config::{DuplicatePolicy, ProjectSettings};
pub use document::{NodeRef, StructuredDocument};
pub use errors::Result;
pub use index::{EntityCollision, EntityIndex, EntityLocation};
pub use store::{DocumentStore, FlushFailure, FlushReport};
