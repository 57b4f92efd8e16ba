//! Document Preprocessors
//!
//! This module provides the preprocessing layer that turns a source document
//! into a `ParsedDocument` (paragraph and table text) for the element walker.
//!
//! ## Architecture
//!
//! ```text
//! Document (DOCX)
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! ParsedDocument (paragraphs + tables)
//!     ↓
//! [Element Walker]
//!     ↓
//! TextElement sequence
//! ```
//!
//! ## Available Preprocessors
//!
//! - `DocxPreprocessor` - Word documents (`word/document.xml`)

pub mod preprocessor;
pub mod docx;

pub use preprocessor::Preprocessor;
pub use docx::DocxPreprocessor;
