use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use licensing_cli::{
    build_extractor, extract_to_file, resolve_config, save_stages, CliOverrides, ExtractionConfig,
    RuleCatalog, StepProfiler,
};

#[derive(Parser)]
#[command(name = "licensing-rules")]
#[command(about = "Extract business licensing rules from a DOCX regulation document")]
struct Args {
    /// Path to the DOCX file to process
    doc: Option<PathBuf>,

    /// Output JSON file
    out: Option<PathBuf>,

    /// Path to config file (YAML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to an alternate rule catalog (YAML format)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Match through a keyword index instead of scanning per rule
    #[arg(long)]
    indexed: bool,

    /// Write JSON without indentation
    #[arg(long)]
    compact: bool,

    /// Print the active rule catalog and exit
    #[arg(long)]
    show_catalog: bool,

    /// Time each pipeline step
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        error!("extraction failed: {e:#}");
        std::process::exit(1);
    }
}

/// Default directive covers only our crates; RUST_LOG replaces it
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let directive = format!("licensing_core={level},licensing_cli={level},licensing_rules={level}");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<()> {
    let overrides = CliOverrides {
        doc: args.doc.clone(),
        out: args.out.clone(),
        catalog: args.catalog.clone(),
        indexed: args.indexed,
        compact: args.compact,
    };
    let config = resolve_config(ExtractionConfig::load_with_fallback(args.config.as_deref()), &overrides);

    let extractor = build_extractor(&config)?;
    if args.show_catalog {
        show_catalog(extractor.catalog());
        return Ok(());
    }

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        let stages = extractor.extract_file_capture_stages(&config.input)?;
        save_stages(&stages, &args.stages_dir, &config.input)?;
        println!("All stages dumped to: {}", args.stages_dir.display());
        return Ok(());
    }

    let mut profiler = StepProfiler::new(args.profile);
    let extracted = extract_to_file(&extractor, &config, &mut profiler)?;
    profiler.log_summary();

    println!("Extracted {} rules to {}", extracted, config.output.display());
    Ok(())
}

fn show_catalog(catalog: &RuleCatalog) {
    println!("Rule catalog ({} rules):", catalog.len());
    for rule in catalog.rules() {
        println!("  {:<26} {} [{}]", rule.id, rule.title, rule.authority);
        println!("  {:<26} keywords: {}", "", rule.keywords.join(", "));
    }
}
