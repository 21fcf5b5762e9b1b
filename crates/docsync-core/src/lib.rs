//! docsync core - pure domain layer
//!
//! This crate holds everything that does not touch the filesystem:
//! - the error and logging facilities shared by every docsync crate
//! - the generated catalog model and new-entity records
//! - run modes and the per-field decision policy
//! - interactive prompting
//! - the lineage merger and its renderers
//! - reconciliation reports and their human summary

pub mod errors;
pub mod lineage;
pub mod logging_facility;
pub mod mode;
pub mod model;
pub mod policy;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use errors::{DocSyncError, ExError, ExErrorKind, Result};
pub use lineage::{merge, ForeignKey, LineageGraph, ModelDependencies, NodeStyle};
pub use mode::Mode;
pub use model::{Catalog, CatalogEntry, ColumnRecord, DriftStatus, EntityKind, EntityRecord, GeneratedColumn};
pub use policy::{FieldDecision, FieldTarget, ModePolicy};
pub use prompt::{LinePrompter, PromptResponse, Prompter};
pub use report::{render_human_summary, Finding, FindingKind, ReconcileReport, WriteFailure};
