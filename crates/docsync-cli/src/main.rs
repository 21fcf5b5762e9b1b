//! docsync CLI
//!
//! Command-line interface for docsync

use clap::{Parser, Subcommand};
use docsync_core::logging_facility::Profile;

mod commands;

/// Run finished; documentation is complete or was updated
const EXIT_OK: i32 = 0;
/// check/drift found changes needed
const EXIT_CI_FAILED: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "docsync")]
#[command(about = "docsync - Keep schema documentation in step with generated metadata", long_about = None)]
struct Cli {
    /// Logging profile (development, production); overrides the settings file
    #[arg(long, global = true)]
    log_profile: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile documentation files against a generated catalog
    Reconcile(commands::reconcile::ReconcileArgs),
    /// Merge foreign keys and model dependencies into a lineage diagram
    Lineage(commands::lineage::LineageArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reconcile(args) => commands::reconcile::execute(args, cli.log_profile),
        Commands::Lineage(args) => commands::lineage::execute(args, cli.log_profile),
    };

    match result {
        Ok(commands::Outcome::Success) => std::process::exit(EXIT_OK),
        Ok(commands::Outcome::CheckFailed) => {
            eprintln!("CI check failed: documentation needs changes");
            std::process::exit(EXIT_CI_FAILED)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}
