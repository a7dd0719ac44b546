//! JSON document export.

use std::path::Path;

use survey_core::ScanResult;
use tracing::info;

use crate::error::ExportError;

/// Render a result as a pretty-printed `{ "list": [...], "errors": [...] }` document.
pub fn to_document_string(result: &ScanResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write a result document to `path`, replacing any existing file.
pub fn write_document(result: &ScanResult, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let json = to_document_string(result)?;
    std::fs::write(path, json).map_err(|e| ExportError::io(path, e))?;
    info!(path = %path.display(), entries = result.list.len(), "document written");
    Ok(())
}
