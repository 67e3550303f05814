//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use pagesdoc_bundle::{compare_bundles, digest, BundleDigest, StyleTable};
use pagesdoc_core::load_blocks;

use crate::batch::{plan_batch, run_batch, BatchReport};
use crate::config::Settings;
use crate::convert::{default_output_path, ConversionOutcome, Converter};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "pagesdoc")]
#[command(author, version, about = "Markdown and text to Pages documents", long_about = None)]
struct Cli {
    /// Config file (defaults to ./pagesdoc.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one Markdown or text file to a .pages bundle
    Convert {
        /// Input file (.md/.markdown are Markdown, anything else is plain text)
        input: PathBuf,

        /// Output bundle (defaults to the input path with a .pages extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert every matching file in a directory
    Batch {
        /// Directory containing source files
        input_dir: PathBuf,

        /// Directory receiving the bundles
        output_dir: PathBuf,

        /// File name glob (overrides [batch] pattern)
        #[arg(short, long)]
        pattern: Option<String>,

        /// Worker threads, 0 for one per CPU (overrides [batch] jobs)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print a bundle's digest and check it against a recorded one
    Verify {
        /// Bundle to check
        bundle: PathBuf,

        /// Recorded digest (full or 16-digit short form)
        #[arg(short, long)]
        expected: Option<String>,

        /// Second bundle to compare member by member
        #[arg(short, long)]
        against: Option<PathBuf>,
    },

    /// Print the block sequence a source file classifies into
    Blocks {
        /// Input file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` directives apply on top of the default level.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert { input, output } => {
            convert_command(&input, output.as_deref(), &settings)?;
        }
        Commands::Batch {
            input_dir,
            output_dir,
            pattern,
            jobs,
            format,
        } => {
            let report = batch_command(
                &input_dir,
                &output_dir,
                pattern.as_deref(),
                jobs,
                format,
                &settings,
            )?;
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Verify {
            bundle,
            expected,
            against,
        } => {
            if !verify_command(&bundle, expected.as_deref(), against.as_deref())? {
                std::process::exit(1);
            }
        }
        Commands::Blocks { input, format } => {
            blocks_command(&input, format)?;
        }
    }

    Ok(())
}

/// Convert one file to a bundle
pub fn convert_command(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<ConversionOutcome> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    println!("pagesdoc v{}", pagesdoc_bundle::VERSION);
    println!("Converting: {}", input.display());

    let styles = StyleTable::pages_default();
    let converter = Converter::new(&styles, settings.document_meta());
    let outcome = converter.convert_file(input, &output_path).map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!("{}: failed to convert {}", kind, input.display()))
    })?;

    println!("  {} blocks", outcome.blocks);
    println!("  Created: {}", outcome.output.display());
    println!("  Size: {} bytes", outcome.bytes);
    println!("Output hash: {}", outcome.digest.short());

    Ok(outcome)
}

/// Convert every matching file in a directory
///
/// Returns the report; per-file failures are in the report, not the error.
pub fn batch_command(
    input_dir: &Path,
    output_dir: &Path,
    pattern: Option<&str>,
    jobs: Option<usize>,
    format: OutputFormat,
    settings: &Settings,
) -> Result<BatchReport> {
    let pattern = pattern.unwrap_or(&settings.batch.pattern);
    let threads = jobs.unwrap_or(settings.batch.jobs);

    let plan = plan_batch(input_dir, output_dir, pattern)?;
    if format == OutputFormat::Text {
        println!("pagesdoc v{}", pagesdoc_bundle::VERSION);
        println!("Converting {} files from {}", plan.len(), input_dir.display());
    }

    let styles = StyleTable::pages_default();
    let converter = Converter::new(&styles, settings.document_meta());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to start worker pool")?;
    let report = pool.install(|| run_batch(&plan, &converter));

    tracing::info!(
        "Batch finished: {} converted, {} failed",
        report.succeeded(),
        report.failed()
    );

    match format {
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize batch report")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!();
            print!("{}", report.to_text());
        }
    }

    Ok(report)
}

/// Print a bundle's digest; returns false when a check failed
pub fn verify_command(
    bundle: &Path,
    expected: Option<&str>,
    against: Option<&Path>,
) -> Result<bool> {
    let bytes =
        fs::read(bundle).with_context(|| format!("Failed to read bundle: {}", bundle.display()))?;
    let actual = digest(&bytes);

    println!("Bundle: {}", bundle.display());
    println!("SHA-256: {}", actual);
    println!("Output hash: {}", actual.short());

    let mut ok = true;
    if let Some(recorded) = expected {
        ok &= report_expected(&actual, recorded);
    }

    if let Some(other) = against {
        let other_bytes = fs::read(other)
            .with_context(|| format!("Failed to read bundle: {}", other.display()))?;
        let other_digest = digest(&other_bytes);
        if other_digest == actual {
            println!("✓ Identical to {}", other.display());
        } else {
            ok = false;
            println!("✗ Differs from {} ({})", other.display(), other_digest.short());
            let diffs = compare_bundles(&bytes, &other_bytes)
                .with_context(|| format!("Failed to compare with {}", other.display()))?;
            for diff in diffs {
                println!("  {}", diff);
            }
        }
    }

    Ok(ok)
}

fn report_expected(actual: &BundleDigest, recorded: &str) -> bool {
    if actual.matches(recorded) {
        println!("✓ Hash matches");
        true
    } else {
        println!("✗ Hash mismatch: expected {}", recorded.trim());
        false
    }
}

/// Print the classified block sequence of a source file
pub fn blocks_command(input: &Path, format: OutputFormat) -> Result<()> {
    let blocks =
        load_blocks(input).with_context(|| format!("Failed to read source: {}", input.display()))?;

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for (index, block) in blocks.iter().enumerate() {
                println!("{:>4}  {:<7}  {}", index, block.role().as_str(), block.text());
            }
            println!();
            println!("{} blocks", blocks.len());
        }
    }

    Ok(())
}
