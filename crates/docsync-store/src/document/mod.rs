//! YAML documentation files

mod layout;
pub mod structured;

pub use layout::NodeRef;
pub use structured::{is_missing, DocumentOrigin, EntityEntry, LineEnding, StructuredDocument};
