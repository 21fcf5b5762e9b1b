//! Lineage merger
//!
//! Unifies physical foreign keys and logical model dependencies into one
//! deduplicated graph whose node styles only ever move up the
//! `table < source < model` lattice.

pub mod graph;
pub mod render;
pub mod style;

pub use graph::{merge, ForeignKey, LineageEdge, LineageGraph, ModelDependencies, FK_LABEL};
pub use render::{GraphEdge, GraphNode, GraphNodeData, GraphObject, EMPTY_DIAGRAM};
pub use style::NodeStyle;
