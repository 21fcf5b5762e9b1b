//! Reconcile command: catalog file + project tree -> report

use std::path::PathBuf;

use docsync_core::{Mode, Prompter, ReconcileReport};
use docsync_store::errors::Result;
use docsync_store::inputs::load_catalog;
use docsync_store::ProjectSettings;

use crate::reconciler::reconcile_project;

/// Inputs of one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Project root; scan directories and stub hints resolve against it
    pub project_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub mode: Mode,
    pub settings: ProjectSettings,
}

/// Load the catalog and run the reconciler over the project.
///
/// # Errors
///
/// Returns catalog load failures and anything the run itself raises.
pub fn reconcile(
    options: ReconcileOptions,
    prompter: Option<&mut dyn Prompter>,
) -> Result<ReconcileReport> {
    let catalog = load_catalog(&options.catalog_path)?;
    let report = reconcile_project(
        &options.project_dir,
        options.settings,
        &catalog,
        options.mode,
        prompter,
    )?;

    tracing::info!(
        mode = %report.mode,
        changes_needed = report.changes_needed,
        written = report.written.len(),
        pending = report.pending.len(),
        write_failures = report.write_failures.len(),
        "reconciliation finished"
    );
    Ok(report)
}
