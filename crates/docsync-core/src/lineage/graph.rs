use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::style::NodeStyle;

/// Label carried by foreign-key edges
pub const FK_LABEL: &str = "FK";

/// Physical foreign-key relationship reported by a database connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub source_table: String,
    #[serde(default)]
    pub source_column: String,
    pub target_table: String,
    #[serde(default)]
    pub target_column: String,
}

impl ForeignKey {
    pub fn new(source_table: impl Into<String>, target_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: String::new(),
            target_table: target_table.into(),
            target_column: String::new(),
        }
    }
}

/// Logical model and the names it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDependencies {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ModelDependencies {
    pub fn new<I, S>(name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Directed edge, unique by `(source, target, label)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineageEdge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

impl LineageEdge {
    /// Stable identifier: `source-target` or `source-target-label`
    pub fn id(&self) -> String {
        match &self.label {
            Some(label) => format!("{}-{}-{}", self.source, self.target, label),
            None => format!("{}-{}", self.source, self.target),
        }
    }
}

/// Deduplicated lineage graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageGraph {
    nodes: BTreeMap<String, NodeStyle>,
    edges: BTreeSet<LineageEdge>,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node or raise its style; a style never moves down
    pub fn add_node(&mut self, id: &str, style: NodeStyle) {
        self.nodes
            .entry(id.to_string())
            .and_modify(|current| *current = current.join(style))
            .or_insert(style);
    }

    pub fn add_edge(&mut self, source: &str, target: &str, label: Option<&str>) {
        self.edges.insert(LineageEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: label.map(str::to_string),
        });
    }

    pub fn add_foreign_keys(&mut self, foreign_keys: &[ForeignKey]) {
        for fk in foreign_keys {
            self.add_node(&fk.source_table, NodeStyle::Table);
            self.add_node(&fk.target_table, NodeStyle::Table);
            self.add_edge(&fk.source_table, &fk.target_table, Some(FK_LABEL));
        }
    }

    pub fn add_models(&mut self, models: &[ModelDependencies]) {
        for model in models {
            self.add_node(&model.name, NodeStyle::Model);
            for dep in &model.dependencies {
                let style = if dep.contains('.') {
                    NodeStyle::Source
                } else {
                    NodeStyle::Model
                };
                self.add_node(dep, style);
                self.add_edge(dep, &model.name, None);
            }
        }
    }

    /// Nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, NodeStyle)> {
        self.nodes.iter().map(|(id, style)| (id.as_str(), *style))
    }

    /// Edges in `(source, target, label)` order
    pub fn edges(&self) -> impl Iterator<Item = &LineageEdge> {
        self.edges.iter()
    }

    pub fn style_of(&self, id: &str) -> Option<NodeStyle> {
        self.nodes.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Merge foreign keys and model dependencies into one graph
pub fn merge(foreign_keys: &[ForeignKey], models: &[ModelDependencies]) -> LineageGraph {
    let mut graph = LineageGraph::new();
    graph.add_foreign_keys(foreign_keys);
    graph.add_models(models);
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "lineage merged"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_overrides_table() {
        let graph = merge(
            &[ForeignKey::new("orders", "customers")],
            &[ModelDependencies::new("customers", ["raw.customers"])],
        );

        assert_eq!(graph.style_of("orders"), Some(NodeStyle::Table));
        assert_eq!(graph.style_of("customers"), Some(NodeStyle::Model));
        assert_eq!(graph.style_of("raw.customers"), Some(NodeStyle::Source));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_style_never_downgrades() {
        let mut graph = LineageGraph::new();
        graph.add_node("stg_orders", NodeStyle::Model);
        graph.add_node("stg_orders", NodeStyle::Table);
        assert_eq!(graph.style_of("stg_orders"), Some(NodeStyle::Model));
    }

    #[test]
    fn test_edges_deduplicate_on_triple() {
        let mut graph = LineageGraph::new();
        graph.add_edge("a", "b", Some(FK_LABEL));
        graph.add_edge("a", "b", Some(FK_LABEL));
        graph.add_edge("a", "b", None);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_edge_ids() {
        let fk = LineageEdge {
            source: "orders".to_string(),
            target: "customers".to_string(),
            label: Some(FK_LABEL.to_string()),
        };
        assert_eq!(fk.id(), "orders-customers-FK");
        let dep = LineageEdge { label: None, ..fk };
        assert_eq!(dep.id(), "orders-customers");
    }
}
