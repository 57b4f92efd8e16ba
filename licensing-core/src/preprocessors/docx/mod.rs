//! DOCX Preprocessor
//!
//! Opens the Office Open XML container, pulls out the main document part and
//! hands it to the WordprocessingML parser.

pub mod xml_parser;

use crate::preprocessors::preprocessor::Preprocessor;
use crate::types::ParsedDocument;
use std::io::{Cursor, Read};
use std::path::Path;

/// Main document part inside a DOCX package
pub const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Default, Clone, Copy)]
pub struct DocxPreprocessor;

impl DocxPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for DocxPreprocessor {
    fn extract_markup(&self, bytes: &[u8]) -> Result<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| format!("not a DOCX package: {e}"))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| format!("missing {DOCUMENT_PART}: {e}"))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| format!("cannot read {DOCUMENT_PART}: {e}"))?;
        Ok(xml)
    }

    fn parse_markup(&self, markup: &str) -> Result<ParsedDocument, String> {
        xml_parser::parse_document_xml(markup)
    }

    fn name(&self) -> &str {
        "DocxPreprocessor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
    }
}
