use crate::matcher::MatchStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_input() -> PathBuf {
    PathBuf::from("data/rules_raw/18-07-2022_4.2A.docx")
}

fn default_output() -> PathBuf {
    PathBuf::from("data/rules.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// DOCX document to extract rules from
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Where the JSON rule catalog is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Alternate rule catalog (YAML); the built-in catalog when absent
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub match_strategy: MatchStrategy,
    /// Indent the JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            catalog: None,
            match_strategy: MatchStrategy::default(),
            pretty: true,
        }
    }
}

impl ExtractionConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!(path = %p.display(), error = %e, "failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
