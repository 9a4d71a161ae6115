//! FeedLens - LLM-powered product feedback analyzer
//!
//! A CLI tool that uses Ollama to turn raw feedback lines into
//! structured analytics, a rule-based health evaluation, and an
//! executive memo.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, input failure, etc.)

mod analysis;
mod cli;
mod config;
mod llm;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use llm::{GeneratorConfig, OllamaClient};
use models::{Report, ReportMetadata};
use pipeline::PipelineOptions;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("FeedLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .feedlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".feedlens.toml");

    if path.exists() {
        eprintln!("⚠️  .feedlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .feedlens.toml")?;

    println!("✅ Created .feedlens.toml with default settings.");
    println!("   Edit it to customize model, report sections, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow.
async fn run_analysis(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Read the feedback lines
    let raw = read_input(&args)?;
    let lines = pipeline::collect_feedback_lines(&raw);
    info!("Collected {} feedback lines", lines.len());

    if lines.is_empty() {
        warn!("Input contained no non-empty lines");
    }

    // Handle --dry-run: list lines and exit
    if args.dry_run {
        return handle_dry_run(&lines);
    }

    // Step 2: Initialize the client
    println!("🤖 Initializing analyzer...");
    println!("   Model: {}", config.model.name);
    println!("   Ollama: {}", config.model.ollama_url);
    println!("   Timeout: {}s per call", config.model.timeout_seconds);

    let generator_config = GeneratorConfig {
        ollama_url: config.model.ollama_url.clone(),
        model_name: config.model.name.clone(),
        temperature: config.model.temperature,
        timeout_seconds: config.model.timeout_seconds,
    };

    let client = OllamaClient::new(generator_config)
        .map_err(|e| anyhow::anyhow!("Failed to create Ollama client: {}", e))?;

    // Step 3: Run the pipeline
    println!("\n🔬 Analyzing feedback ({} lines, one call each)...\n", lines.len());

    let options = PipelineOptions {
        include_memo: config.report.include_memo,
        show_progress: !args.quiet,
    };

    let outcome = pipeline::run_pipeline(&client, &lines, &options).await;
    let duration = start_time.elapsed().as_secs_f64();

    // Step 4: Build the report
    println!("📝 Generating report...");

    let metadata = ReportMetadata {
        analysis_date: Utc::now(),
        model_used: config.model.name.clone(),
        lines_processed: lines.len(),
        records_failed: outcome.failed_record_count(),
        duration_seconds: duration,
    };

    let report = Report {
        metadata,
        analytics: outcome.analytics.clone(),
        evaluation: outcome.evaluation.clone(),
        memo: outcome.memo.clone(),
        records: outcome.records.clone(),
    };

    // Step 5: Render and save
    let output_text = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = std::path::Path::new(&config.general.output);
    std::fs::write(output_path, &output_text)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Analysis Summary:");
    println!(
        "   Records: {} ({} failed)",
        outcome.records.len(),
        outcome.failed_record_count()
    );
    println!(
        "   High priority issues: {}",
        outcome.analytics.high_priority_count
    );
    println!(
        "   Themes detected: {}",
        outcome.analytics.detected_themes.len()
    );
    println!("   Duration: {:.1}s", duration);

    if !args.quiet {
        println!("{}", outcome.evaluation);
    }

    println!(
        "✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Handle --dry-run: list the collected lines, no LLM calls.
fn handle_dry_run(lines: &[String]) -> Result<()> {
    println!("\n🔍 Dry run: collecting feedback lines (no LLM call)...\n");

    if lines.is_empty() {
        println!("   No non-empty feedback lines found.");
    } else {
        println!("   Found {} lines that would be analyzed:\n", lines.len());
        for line in lines {
            println!("     💬 {}", line);
        }
        println!("\n   Total: {} lines", lines.len());
    }

    println!("\n✅ Dry run complete. No LLM calls were made.");
    Ok(())
}

/// Read the raw feedback text from the input file or stdin.
fn read_input(args: &Args) -> Result<String> {
    if args.reads_stdin() {
        info!("Reading feedback from stdin");
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read feedback from stdin")?;
        return Ok(raw);
    }

    let path = args
        .input
        .as_deref()
        .context("No input file provided")?;

    info!("Reading feedback from: {}", path.display());
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .feedlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
