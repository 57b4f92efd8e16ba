use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the extraction pipeline.
///
/// Every variant is fatal for the run: extraction either completes over the
/// whole catalog or fails before anything is written.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Document unreadable: {path}: {reason}")]
    DocumentUnreadable { path: PathBuf, reason: String },

    #[error("Malformed rule catalog: {0}")]
    MalformedCatalog(String),

    #[error("Rule catalog unreadable: {path}: {reason}")]
    CatalogUnreadable { path: PathBuf, reason: String },

    #[error("Failed to write output {path}: {reason}")]
    Output { path: PathBuf, reason: String },
}

impl ExtractionError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DocumentUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Output {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
