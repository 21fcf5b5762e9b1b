//! Domain model: the generated catalog consumed by reconciliation and the
//! entity records written into documentation files.

pub mod catalog;
pub mod entity;

pub use catalog::{Catalog, CatalogEntry, DriftStatus, GeneratedColumn};
pub use entity::{ColumnRecord, EntityKind, EntityRecord};
