use serde::{Deserialize, Serialize};

use super::graph::LineageGraph;
use super::style::NodeStyle;

/// Diagram emitted for a graph with no nodes
pub const EMPTY_DIAGRAM: &str = "graph TD;\n  A[No lineage data found]";

/// Node/edge object consumed by interactive graph viewers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphObject {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub data: GraphNodeData,
    #[serde(rename = "type")]
    pub style: NodeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNodeData {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Empty when the edge is unlabelled
    pub label: String,
}

impl LineageGraph {
    /// Mermaid `graph TD;` text: node definitions, a blank line, then edges
    pub fn to_diagram_text(&self) -> String {
        let mut lines = vec!["graph TD;".to_string()];
        for (id, style) in self.nodes() {
            lines.push(format!("    {}", style.diagram_shape(id)));
        }
        lines.push(String::new());
        for edge in self.edges() {
            match &edge.label {
                Some(label) => lines.push(format!(
                    "    {} -- \"{}\" --> {}",
                    edge.source, label, edge.target
                )),
                None => lines.push(format!("    {} --> {}", edge.source, edge.target)),
            }
        }
        lines.join("\n")
    }

    pub fn to_graph_object(&self) -> GraphObject {
        GraphObject {
            nodes: self
                .nodes()
                .map(|(id, style)| GraphNode {
                    id: id.to_string(),
                    data: GraphNodeData {
                        label: id.to_string(),
                    },
                    style,
                })
                .collect(),
            edges: self
                .edges()
                .map(|edge| GraphEdge {
                    id: edge.id(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    label: edge.label.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Markdown document with the diagram in a fenced `mermaid` block
    pub fn to_markdown_document(&self) -> String {
        let diagram = if self.is_empty() {
            EMPTY_DIAGRAM.to_string()
        } else {
            self.to_diagram_text()
        };
        format!("# Global Data Lineage\n\n```mermaid\n{}\n```\n", diagram)
    }
}
