use crate::error::{ExtractionError, Result};
use crate::types::ExtractionResult;
use std::path::Path;

/// Serialise results as a JSON array. Non-ASCII text is written verbatim.
pub fn to_json(results: &[ExtractionResult], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(results)
    } else {
        serde_json::to_string(results)
    }
}

/// Write the result array to `path`, creating parent directories as needed.
pub fn write_results(results: &[ExtractionResult], path: &Path, pretty: bool) -> Result<()> {
    let json = to_json(results, pretty).map_err(|e| ExtractionError::output(path, e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ExtractionError::output(path, e))?;
    }
    std::fs::write(path, json).map_err(|e| ExtractionError::output(path, e))
}
