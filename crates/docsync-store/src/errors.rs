//! Error handling for docsync-store
//!
//! Wraps docsync-core ExError with store-specific helpers

use std::path::Path;

use docsync_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a parse error for a document or input file
pub fn parse_error(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Parse)
        .with_op("parse_document")
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create a per-file write error
pub fn write_error(path: &Path, err: &ExError) -> ExError {
    ExError::new(ExErrorKind::Write)
        .with_op("flush_document")
        .with_path(path.display().to_string())
        .with_message("document could not be written")
        .with_source(err.clone())
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = if err.kind() == std::io::ErrorKind::NotFound {
        ExErrorKind::NotFound
    } else {
        ExErrorKind::Io
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a settings-file error
pub fn config_error(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_settings")
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create an error for a malformed JSON input file
pub fn input_error(operation: &str, path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create a serialization error for a value that cannot be rendered as YAML
pub fn render_error(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("render_document")
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create an error for an edit that cannot be made without disturbing other lines
pub fn uneditable_error(path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Uneditable)
        .with_op("edit_document")
        .with_path(path.display().to_string())
        .with_message(reason)
}
