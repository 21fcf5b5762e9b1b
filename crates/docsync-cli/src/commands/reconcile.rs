//! Reconcile command
//!
//! Usage: docsync reconcile --catalog <FILE> [--project-dir <DIR>]
//!        [--mode update|check|interactive|drift] [--config <FILE>] [--summary <FILE>]

use clap::Args;
use std::path::PathBuf;

use docsync_core::logging_facility::{self, Profile};
use docsync_core::{render_human_summary, LinePrompter, Mode, Prompter};
use docsync_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use docsync_engine::commands::reconcile::ReconcileOptions;
use docsync_store::ProjectSettings;

use super::Outcome;

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Generated catalog JSON
    #[arg(long)]
    pub catalog: PathBuf,

    /// Project root holding models/, seeds/ and snapshots/
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// update, check, interactive or drift
    #[arg(long, default_value = "update")]
    pub mode: Mode,

    /// Settings file (default: <project-dir>/docsync.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write the Markdown summary to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Execute reconcile command
pub fn execute(
    args: ReconcileArgs,
    log_profile: Option<Profile>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let settings = ProjectSettings::load(&args.project_dir, args.config.as_deref())?;
    let profile = match log_profile {
        Some(profile) => profile,
        None => settings.logging.profile()?,
    };
    logging_facility::init(profile);

    let options = ReconcileOptions {
        project_dir: args.project_dir,
        catalog_path: args.catalog,
        mode: args.mode,
        settings,
    };

    let result = if args.mode == Mode::Interactive {
        let mut prompter = LinePrompter::stdio();
        apply_engine_command(
            EngineCommand::Reconcile(options),
            Some(&mut prompter as &mut dyn Prompter),
        )?
    } else {
        apply_engine_command(EngineCommand::Reconcile(options), None)?
    };
    let EngineCommandResult::Reconcile(report) = result else {
        return Err("reconcile returned an unexpected result".into());
    };

    let summary = render_human_summary(&report);
    print!("{}", summary);
    if let Some(path) = args.summary {
        std::fs::write(&path, &summary)?;
    }

    if report.has_write_failures() {
        return Err(format!(
            "{} document(s) could not be written",
            report.write_failures.len()
        )
        .into());
    }
    if report.ci_failed() {
        return Ok(Outcome::CheckFailed);
    }
    Ok(Outcome::Success)
}
