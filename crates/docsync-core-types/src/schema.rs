//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Reconciliation subjects
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_COLUMN: &str = "column";
pub const FIELD_FIELD_KEY: &str = "field";
pub const FIELD_PATH: &str = "path";
pub const FIELD_MODE: &str = "mode";

// Collection sizes
pub const FIELD_DOCUMENT_COUNT: &str = "document_count";
pub const FIELD_ENTITY_COUNT: &str = "entity_count";
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_EDGE_COUNT: &str = "edge_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
