// Licensing Rules Core Library
//
// Extracts regulatory rule statements from DOCX documents by keyword matching
// against a rule catalog. Main interface: RuleExtractor.

pub mod types;
pub mod error;
pub mod preprocessors;
pub mod walker;
pub mod catalog;
pub mod matcher;
pub mod assembler;
pub mod processor;
pub mod output;
pub mod config;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{ExtractionError, Result};
pub use preprocessors::{DocxPreprocessor, Preprocessor};
pub use catalog::RuleCatalog;
pub use matcher::MatchStrategy;
pub use processor::{PipelineStages, RuleExtractor, StepProfiler};
pub use config::ExtractionConfig;
