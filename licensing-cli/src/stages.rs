use anyhow::Result;
use licensing_core::PipelineStages;
use std::fs;
use std::path::Path;
use tracing::info;

/// Write every intermediate pipeline output into `output_dir`
pub fn save_stages(stages: &PipelineStages, output_dir: &Path, input: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    // Stage 1: Raw WordprocessingML
    let xml_path = output_dir.join("stage1_document.xml");
    fs::write(&xml_path, &stages.markup)?;
    info!(path = %xml_path.display(), "saved stage");

    // Stage 2: Paragraphs and tables
    let doc_path = output_dir.join("stage2_parsed_document.json");
    fs::write(&doc_path, serde_json::to_string_pretty(&stages.document)?)?;
    info!(
        path = %doc_path.display(),
        paragraphs = stages.document.paragraphs.len(),
        tables = stages.document.tables.len(),
        "saved stage"
    );

    // Stage 3: Text elements
    let elements_path = output_dir.join("stage3_elements.json");
    fs::write(&elements_path, serde_json::to_string_pretty(&stages.elements)?)?;
    info!(path = %elements_path.display(), elements = stages.elements.len(), "saved stage");

    // Stage 4: Extraction results
    let results_path = output_dir.join("stage4_results.json");
    fs::write(&results_path, serde_json::to_string_pretty(&stages.results)?)?;
    info!(path = %results_path.display(), results = stages.results.len(), "saved stage");

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input_document": input.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "markup_bytes": stages.markup.len(),
            "paragraphs": stages.document.paragraphs.len(),
            "tables": stages.document.tables.len(),
            "elements": stages.elements.len(),
            "results": stages.results.len(),
        }
    });
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    info!(path = %summary_path.display(), "saved stage");

    Ok(())
}
