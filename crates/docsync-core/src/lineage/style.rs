use serde::{Deserialize, Serialize};

/// Node style; declaration order is the priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    /// Physical database table
    Table,
    /// Cross-system source (`schema.table`)
    Source,
    /// Transformation model
    Model,
}

impl NodeStyle {
    /// Least upper bound of two styles
    pub fn join(self, other: NodeStyle) -> NodeStyle {
        self.max(other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeStyle::Table => "table",
            NodeStyle::Source => "source",
            NodeStyle::Model => "model",
        }
    }

    /// Mermaid node definition for `id` in this style
    pub fn diagram_shape(self, id: &str) -> String {
        match self {
            NodeStyle::Model => format!("{id}[\"{id}\"]"),
            NodeStyle::Table => format!("{id}[(\"{id}\")]"),
            NodeStyle::Source => format!("{id}((\"{id}\"))"),
        }
    }
}

impl std::fmt::Display for NodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
