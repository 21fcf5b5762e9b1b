//! Engine-level commands that touch the filesystem.

use std::path::PathBuf;

use docsync_core::{LineageGraph, Prompter, ReconcileReport};
use docsync_store::errors::Result;

use crate::commands::lineage::build_lineage;
use crate::commands::reconcile::{reconcile, ReconcileOptions};

/// Engine-level commands (document reconciliation, lineage merge).
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Reconcile the project's documents against a generated catalog.
    Reconcile(ReconcileOptions),
    /// Merge foreign keys and model dependencies into one lineage graph.
    Lineage {
        foreign_keys_path: PathBuf,
        models_path: PathBuf,
    },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Reconcile(ReconcileReport),
    Lineage(LineageGraph),
}

/// Apply an engine command.
///
/// `prompter` is consulted only by an interactive reconcile.
///
/// # Errors
///
/// Propagates the failure of the underlying command.
pub fn apply_engine_command(
    cmd: EngineCommand,
    prompter: Option<&mut dyn Prompter>,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Reconcile(options) => {
            reconcile(options, prompter).map(EngineCommandResult::Reconcile)
        }
        EngineCommand::Lineage {
            foreign_keys_path,
            models_path,
        } => build_lineage(&foreign_keys_path, &models_path).map(EngineCommandResult::Lineage),
    }
}
