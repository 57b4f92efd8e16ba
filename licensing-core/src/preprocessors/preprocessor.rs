// Preprocessor abstraction for document reading
//
// This module defines the boundary between document parsing (DOCX -> ParsedDocument)
// and rule extraction (ParsedDocument -> ExtractionResult). Everything after this
// point only sees paragraph and table text.

use crate::error::{ExtractionError, Result};
use crate::types::ParsedDocument;
use std::path::Path;

/// Preprocessor trait - converts documents to a ParsedDocument
///
/// The preprocessing happens in two steps:
/// 1. Document -> Markup (e.g. DOCX container -> `word/document.xml`)
/// 2. Markup -> ParsedDocument (paragraphs and tables)
pub trait Preprocessor {
    /// Step 1: Pull the markup out of the raw document bytes
    fn extract_markup(&self, bytes: &[u8]) -> std::result::Result<String, String>;

    /// Step 2: Parse markup into paragraphs and tables
    fn parse_markup(&self, markup: &str) -> std::result::Result<ParsedDocument, String>;

    /// Full document processing (combines both steps)
    fn process(&self, bytes: &[u8]) -> std::result::Result<ParsedDocument, String> {
        let markup = self.extract_markup(bytes)?;
        self.parse_markup(&markup)
    }

    /// Read and process a file, mapping failures onto the extraction error taxonomy
    fn process_file(&self, input: &Path) -> Result<ParsedDocument> {
        let bytes = read_document(input)?;
        self.process(&bytes)
            .map_err(|reason| ExtractionError::unreadable(input, reason))
    }

    /// Get preprocessor name for logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}

/// Read a document's bytes, distinguishing a missing file from an unreadable one.
pub fn read_document(input: &Path) -> Result<Vec<u8>> {
    if !input.exists() {
        return Err(ExtractionError::DocumentNotFound(input.to_path_buf()));
    }
    std::fs::read(input).map_err(|e| ExtractionError::unreadable(input, e))
}
