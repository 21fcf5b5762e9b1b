//! JSON input files produced by external collaborators

use std::path::Path;

use docsync_core::{Catalog, ForeignKey, ModelDependencies};
use serde::de::DeserializeOwned;

use crate::errors::{input_error, io_error, Result};

/// Load the generated catalog
///
/// # Errors
///
/// Returns `NotFound`/`Io` if the file cannot be read and `InvalidCatalog`
/// if it is not a catalog object.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error("load_catalog", path, e))?;
    let catalog = Catalog::from_json_str(&text)
        .map_err(|e| docsync_core::ExError::from(e).with_op("load_catalog").with_path(path.display().to_string()))?;
    tracing::debug!(path = %path.display(), entity_count = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Load foreign keys: `[{source_table, source_column, target_table, target_column}]`
///
/// # Errors
///
/// Returns `NotFound`/`Io` if the file cannot be read and `InvalidInput`
/// if it does not match the expected shape.
pub fn load_foreign_keys(path: &Path) -> Result<Vec<ForeignKey>> {
    load_json_list("load_foreign_keys", path)
}

/// Load model dependencies: `[{name, dependencies: [...]}]`
///
/// # Errors
///
/// Returns `NotFound`/`Io` if the file cannot be read and `InvalidInput`
/// if it does not match the expected shape.
pub fn load_model_dependencies(path: &Path) -> Result<Vec<ModelDependencies>> {
    load_json_list("load_model_dependencies", path)
}

fn load_json_list<T: DeserializeOwned>(op: &str, path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(op, path, e))?;
    let items: Vec<T> = serde_json::from_str(&text).map_err(|e| input_error(op, path, e.to_string()))?;
    tracing::debug!(path = %path.display(), count = items.len(), "{} done", op);
    Ok(items)
}
