use anyhow::{Context, Result};
use licensing_core::{output, ExtractionConfig, MatchStrategy, RuleCatalog, RuleExtractor, StepProfiler};
use std::path::PathBuf;

/// Values given on the command line, layered over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub doc: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub indexed: bool,
    pub compact: bool,
}

/// Config file first, then command-line values on top
pub fn resolve_config(mut config: ExtractionConfig, overrides: &CliOverrides) -> ExtractionConfig {
    if let Some(doc) = &overrides.doc {
        config.input = doc.clone();
    }
    if let Some(out) = &overrides.out {
        config.output = out.clone();
    }
    if let Some(catalog) = &overrides.catalog {
        config.catalog = Some(catalog.clone());
    }
    if overrides.indexed {
        config.match_strategy = MatchStrategy::Indexed;
    }
    if overrides.compact {
        config.pretty = false;
    }
    config
}

/// Extractor for the catalog and strategy a config names
pub fn build_extractor(config: &ExtractionConfig) -> Result<RuleExtractor> {
    let catalog = RuleCatalog::load(config.catalog.as_deref()).context("loading rule catalog")?;
    Ok(RuleExtractor::new(catalog).with_strategy(config.match_strategy))
}

/// Extract from `config.input` and write `config.output`, returning how many
/// rules matched. Nothing is written unless extraction succeeds.
pub fn extract_to_file(
    extractor: &RuleExtractor,
    config: &ExtractionConfig,
    profiler: &mut StepProfiler,
) -> Result<usize> {
    let results = extractor.extract_file_with_profiling(&config.input, profiler)?;
    profiler.time_step("Write Output", || {
        output::write_results(&results, &config.output, config.pretty)
    })?;
    Ok(results.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn config_file(dir: &Path) -> PathBuf {
        let path = dir.join("extraction.yaml");
        fs::write(
            &path,
            "input: from_config.docx\noutput: from_config.json\nmatch_strategy: scan\npretty: true\n",
        )
        .unwrap();
        path
    }

    fn config_for(input: PathBuf, output: PathBuf) -> ExtractionConfig {
        resolve_config(
            ExtractionConfig::default(),
            &CliOverrides {
                doc: Some(input),
                out: Some(output),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_positional_paths_beat_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = ExtractionConfig::load_with_fallback(Some(&config_file(dir.path())));
        assert_eq!(base.input, PathBuf::from("from_config.docx"));

        let config = resolve_config(
            base,
            &CliOverrides {
                doc: Some(PathBuf::from("cli.docx")),
                out: Some(PathBuf::from("cli.json")),
                ..Default::default()
            },
        );
        assert_eq!(config.input, PathBuf::from("cli.docx"));
        assert_eq!(config.output, PathBuf::from("cli.json"));
    }

    #[test]
    fn test_config_file_values_survive_without_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let base = ExtractionConfig::load_with_fallback(Some(&config_file(dir.path())));
        let config = resolve_config(base.clone(), &CliOverrides::default());
        assert_eq!(config, base);
    }

    #[test]
    fn test_flags_override_strategy_and_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let base = ExtractionConfig::load_with_fallback(Some(&config_file(dir.path())));
        let config = resolve_config(
            base,
            &CliOverrides {
                catalog: Some(PathBuf::from("alt.yaml")),
                indexed: true,
                compact: true,
                ..Default::default()
            },
        );
        assert_eq!(config.match_strategy, MatchStrategy::Indexed);
        assert!(!config.pretty);
        assert_eq!(config.catalog, Some(PathBuf::from("alt.yaml")));
        assert_eq!(config.input, PathBuf::from("from_config.docx"));
    }

    #[test]
    fn test_missing_input_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out/rules.json");
        let config = config_for(dir.path().join("absent.docx"), out.clone());

        let extractor = build_extractor(&config).unwrap();
        let err = extract_to_file(&extractor, &config, &mut StepProfiler::new(false)).unwrap_err();
        assert!(err.to_string().contains("not found"), "{err:#}");
        assert!(!out.exists());
    }

    #[test]
    fn test_non_docx_input_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.docx");
        fs::write(&input, "plain text, not a zip").unwrap();
        let out = dir.path().join("rules.json");
        let config = config_for(input, out.clone());

        let extractor = build_extractor(&config).unwrap();
        assert!(extract_to_file(&extractor, &config, &mut StepProfiler::new(true)).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_unreadable_catalog_fails_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path().join("a.docx"), dir.path().join("rules.json"));
        config.catalog = Some(dir.path().join("missing_catalog.yaml"));
        let err = build_extractor(&config).err().unwrap();
        assert!(format!("{err:#}").starts_with("loading rule catalog"));
    }
}
