// All extraction logic is in licensing-rules-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod cli;
pub mod stages;

// Re-export core types for convenience
pub use licensing_core::*;

pub use cli::{build_extractor, extract_to_file, resolve_config, CliOverrides};
pub use stages::save_stages;
