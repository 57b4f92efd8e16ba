use crate::assembler;
use crate::catalog::RuleCatalog;
use crate::error::{ExtractionError, Result};
use crate::matcher::MatchStrategy;
use crate::preprocessors::preprocessor::read_document;
use crate::preprocessors::{DocxPreprocessor, Preprocessor};
use crate::types::*;
use crate::walker;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Captured intermediate outputs from each pipeline stage
/// Used for diagnostics: lets you inspect each boundary separately
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub markup: String,
    pub document: ParsedDocument,
    pub elements: Vec<TextElement>,
    pub results: Vec<ExtractionResult>,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        info!(step = step_name, elapsed_ms = elapsed.as_millis() as u64, "step finished");
        self.timings.push((step_name.to_string(), elapsed));

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            info!("{:.<35} {}us ({:.1}%)", step, duration.as_micros(), percentage);
        }
        info!("{:.<35} {}us", "Total", total.as_micros());
    }
}

/// Runs walk → match → assemble for one document at a time.
///
/// Holds no per-document state, so one extractor can serve any number of
/// documents.
pub struct RuleExtractor {
    preprocessor: Box<dyn Preprocessor + Send + Sync>,
    catalog: RuleCatalog,
    strategy: MatchStrategy,
}

impl RuleExtractor {
    /// Create RuleExtractor with full dependency injection
    pub fn new_with_dependencies(
        preprocessor: Box<dyn Preprocessor + Send + Sync>,
        catalog: RuleCatalog,
        strategy: MatchStrategy,
    ) -> Self {
        Self {
            preprocessor,
            catalog,
            strategy,
        }
    }

    /// DOCX preprocessor with the given catalog and the default scan strategy
    pub fn new(catalog: RuleCatalog) -> Self {
        Self::new_with_dependencies(Box::new(DocxPreprocessor::new()), catalog, MatchStrategy::Scan)
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Extract rules from an already parsed document.
    pub fn extract_parsed(
        &self,
        document: &ParsedDocument,
        doc_name: &str,
    ) -> Vec<ExtractionResult> {
        let elements: Vec<TextElement> = walker::walk(document).collect();
        assembler::assemble(&self.catalog, &elements, doc_name, self.strategy)
    }

    /// Extract rules from a document on disk
    pub fn extract_file(&self, input: &Path) -> Result<Vec<ExtractionResult>> {
        self.extract_file_with_profiling(input, &mut StepProfiler::new(false))
    }

    pub fn extract_file_with_profiling(
        &self,
        input: &Path,
        profiler: &mut StepProfiler,
    ) -> Result<Vec<ExtractionResult>> {
        info!(input = %input.display(), preprocessor = self.preprocessor.name(), "processing document");

        let document =
            profiler.time_step("Read + Parse Document", || self.preprocessor.process_file(input))?;
        let elements: Vec<TextElement> =
            profiler.time_step("Walk Elements", || walker::walk(&document).collect());
        info!(
            paragraphs = document.paragraphs.len(),
            tables = document.tables.len(),
            elements = elements.len(),
            "document walked"
        );

        let doc_name = document_name(input);
        let results = profiler.time_step("Match + Assemble", || {
            assembler::assemble(&self.catalog, &elements, &doc_name, self.strategy)
        });
        info!(
            rules = self.catalog.len(),
            matched = results.len(),
            strategy = ?self.strategy,
            "extraction finished"
        );

        Ok(results)
    }

    /// Run the pipeline and keep every intermediate output
    pub fn extract_file_capture_stages(&self, input: &Path) -> Result<PipelineStages> {
        let bytes = read_document(input)?;
        let markup = self
            .preprocessor
            .extract_markup(&bytes)
            .map_err(|reason| ExtractionError::unreadable(input, reason))?;
        let document = self
            .preprocessor
            .parse_markup(&markup)
            .map_err(|reason| ExtractionError::unreadable(input, reason))?;
        let elements: Vec<TextElement> = walker::walk(&document).collect();
        let results =
            assembler::assemble(&self.catalog, &elements, &document_name(input), self.strategy);

        Ok(PipelineStages {
            markup,
            document,
            elements,
            results,
        })
    }
}

/// File name component used as provenance, falling back to the full path.
pub fn document_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}
