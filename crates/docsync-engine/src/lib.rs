//! docsync engine - orchestration layer
//!
//! Ties the pure domain layer (`docsync-core`) to the file layer
//! (`docsync-store`): one reconciliation run over a project tree, and the
//! lineage merge over the JSON relationship inputs.

pub mod commands;
pub mod reconciler;

pub use reconciler::ReconciliationEngine;
