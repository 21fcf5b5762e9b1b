//! Lineage command: foreign keys + model dependencies -> one graph

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use docsync_core::errors::{DocSyncError, ExError, ExErrorKind};
use docsync_core::{log_op_end, log_op_start, merge, LineageGraph};
use docsync_store::errors::Result;
use docsync_store::inputs::{load_foreign_keys, load_model_dependencies};

/// Output rendering of a lineage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineageFormat {
    /// Bare Mermaid diagram text
    #[default]
    Mermaid,
    /// Node/edge object for graph viewers
    Json,
    /// Markdown page wrapping the diagram
    Markdown,
}

impl FromStr for LineageFormat {
    type Err = DocSyncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mermaid" => Ok(LineageFormat::Mermaid),
            "json" => Ok(LineageFormat::Json),
            "markdown" => Ok(LineageFormat::Markdown),
            other => Err(DocSyncError::InvalidInput {
                message: format!(
                    "unknown lineage format '{}' (expected mermaid, json or markdown)",
                    other
                ),
            }),
        }
    }
}

/// Load both inputs and merge them.
///
/// # Errors
///
/// Returns `NotFound`/`Io` for unreadable files and `InvalidInput` for
/// malformed JSON.
pub fn build_lineage(foreign_keys_path: &Path, models_path: &Path) -> Result<LineageGraph> {
    let start = Instant::now();
    log_op_start!("lineage", path = %foreign_keys_path.display());

    let foreign_keys = load_foreign_keys(foreign_keys_path)?;
    let models = load_model_dependencies(models_path)?;
    let graph = merge(&foreign_keys, &models);

    log_op_end!(
        "lineage",
        duration_ms = start.elapsed().as_millis() as u64,
        node_count = graph.node_count(),
        edge_count = graph.edge_count()
    );
    Ok(graph)
}

/// Render a graph in the requested format.
///
/// # Errors
///
/// Returns `Serialization` if the JSON object cannot be encoded.
pub fn render_lineage(graph: &LineageGraph, format: LineageFormat) -> Result<String> {
    match format {
        LineageFormat::Mermaid => Ok(graph.to_diagram_text()),
        LineageFormat::Markdown => Ok(graph.to_markdown_document()),
        LineageFormat::Json => serde_json::to_string_pretty(&graph.to_graph_object()).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("render_lineage")
                .with_message(e.to_string())
        }),
    }
}
