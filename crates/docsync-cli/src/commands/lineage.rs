//! Lineage command
//!
//! Usage: docsync lineage --foreign-keys <FILE> --models <FILE>
//!        [--format mermaid|json|markdown] [--output <FILE>]

use clap::Args;
use std::path::PathBuf;

use docsync_core::logging_facility::{self, Profile};
use docsync_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use docsync_engine::commands::lineage::{render_lineage, LineageFormat};

use super::Outcome;

#[derive(Debug, Args)]
pub struct LineageArgs {
    /// Foreign keys JSON: [{source_table, source_column, target_table, target_column}]
    #[arg(long)]
    pub foreign_keys: PathBuf,

    /// Model dependencies JSON: [{name, dependencies}]
    #[arg(long)]
    pub models: PathBuf,

    /// mermaid, json or markdown
    #[arg(long, default_value = "mermaid")]
    pub format: LineageFormat,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute lineage command
pub fn execute(
    args: LineageArgs,
    log_profile: Option<Profile>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    logging_facility::init(log_profile.unwrap_or(Profile::Development));

    let result = apply_engine_command(
        EngineCommand::Lineage {
            foreign_keys_path: args.foreign_keys,
            models_path: args.models,
        },
        None,
    )?;
    let EngineCommandResult::Lineage(graph) = result else {
        return Err("lineage returned an unexpected result".into());
    };

    let mut text = render_lineage(&graph, args.format)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &text)?;
        eprintln!(
            "Lineage written to {} ({} nodes, {} edges)",
            output_path.display(),
            graph.node_count(),
            graph.edge_count()
        );
    } else {
        print!("{}", text);
    }

    Ok(Outcome::Success)
}
