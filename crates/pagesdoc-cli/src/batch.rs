//! Batch conversion of a directory
//!
//! Jobs are planned up front (sorted, one output per input) and then run
//! in parallel. Each worker owns its job; the converter is shared
//! read-only. A failed job is recorded in the report and never stops the
//! others.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use rayon::prelude::*;
use serde::Serialize;

use pagesdoc_ast::ErrorKind;

use crate::convert::{ConversionError, ConversionOutcome, Converter, BUNDLE_EXTENSION};

/// One planned conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Source file
    pub input: PathBuf,
    /// Bundle destination
    pub output: PathBuf,
}

/// Plan conversions for files directly inside `input_dir` matching `pattern`.
///
/// Inputs are sorted; directories and existing `.pages` bundles are
/// skipped, so no job reads a file another job writes, even when
/// `output_dir` is `input_dir`. Each input maps to `output_dir/<stem>.pages`;
/// when two inputs share a stem, the later one keeps its full file name
/// (`notes.txt.pages`).
pub fn plan_batch(input_dir: &Path, output_dir: &Path, pattern: &str) -> Result<Vec<BatchJob>> {
    if !input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", input_dir.display());
    }
    if pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR) {
        anyhow::bail!("Pattern must match file names, not paths: {}", pattern);
    }
    Pattern::new(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;

    let base = Pattern::escape(&input_dir.display().to_string());
    let full_pattern = Path::new(&base).join(pattern).display().to_string();

    let mut inputs = Vec::new();
    let entries =
        glob(&full_pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
    for entry in entries {
        match entry {
            Ok(path) if is_bundle(&path) => {
                tracing::debug!("Skipping bundle {}", path.display());
            }
            Ok(path) if path.is_file() => inputs.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not read {}", e),
        }
    }
    inputs.sort();

    let mut taken = HashSet::new();
    let jobs = inputs
        .into_iter()
        .map(|input| {
            let output = unique_output(&input, output_dir, &mut taken);
            BatchJob { input, output }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Planned {} jobs from {} matching {}",
        jobs.len(),
        input_dir.display(),
        pattern
    );
    Ok(jobs)
}

fn is_bundle(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(BUNDLE_EXTENSION))
}

fn unique_output(input: &Path, output_dir: &Path, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = input.file_name().unwrap_or_default().to_string_lossy();

    let mut path = output_dir.join(format!("{}.{}", stem, BUNDLE_EXTENSION));
    let mut attempt = 0;
    while !taken.insert(path.clone()) {
        attempt += 1;
        let name = match attempt {
            1 => format!("{}.{}", file_name, BUNDLE_EXTENSION),
            n => format!("{}-{}.{}", file_name, n, BUNDLE_EXTENSION),
        };
        path = output_dir.join(name);
    }
    path
}

/// Outcome of one batch job
#[derive(Debug)]
pub struct BatchOutcome {
    /// The job that ran
    pub job: BatchJob,
    /// What happened
    pub result: std::result::Result<ConversionOutcome, ConversionError>,
}

/// Convert every job in parallel on the current rayon pool.
///
/// Outcomes are returned in job order.
pub fn run_batch(jobs: &[BatchJob], converter: &Converter<'_>) -> BatchReport {
    let outcomes = jobs
        .par_iter()
        .map(|job| {
            let result = converter.convert_file(&job.input, &job.output);
            if let Err(e) = &result {
                tracing::error!("Failed to convert {}: {} ({})", job.input.display(), e, e.kind());
            }
            BatchOutcome {
                job: job.clone(),
                result,
            }
        })
        .collect();

    BatchReport { outcomes }
}

/// Per-file results of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcomes in job order
    pub outcomes: Vec<BatchOutcome>,
}

#[derive(Serialize)]
struct FileReport {
    input: String,
    output: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportJson {
    total: usize,
    succeeded: usize,
    failed: usize,
    files: Vec<FileReport>,
}

impl BatchReport {
    /// Number of files converted
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of files that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether every file converted
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Render as a JSON document
    pub fn to_json(&self) -> serde_json::Result<String> {
        let files = self
            .outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(done) => FileReport {
                    input: o.job.input.display().to_string(),
                    output: o.job.output.display().to_string(),
                    status: "ok",
                    digest: Some(done.digest.to_hex()),
                    blocks: Some(done.blocks),
                    error_kind: None,
                    error: None,
                },
                Err(e) => FileReport {
                    input: o.job.input.display().to_string(),
                    output: o.job.output.display().to_string(),
                    status: "failed",
                    digest: None,
                    blocks: None,
                    error_kind: Some(e.kind()),
                    error: Some(e.to_string()),
                },
            })
            .collect();

        serde_json::to_string_pretty(&ReportJson {
            total: self.outcomes.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            files,
        })
    }

    /// Render as a human-readable table
    pub fn to_text(&self) -> String {
        let names: Vec<String> = self
            .outcomes
            .iter()
            .map(|o| {
                o.job
                    .input
                    .file_name()
                    .unwrap_or(o.job.input.as_os_str())
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0).max(5);

        let mut out = String::new();
        let _ = writeln!(out, "{:<6}  {:<width$}  RESULT", "STATUS", "INPUT");
        for (outcome, name) in self.outcomes.iter().zip(&names) {
            match &outcome.result {
                Ok(done) => {
                    let _ = writeln!(
                        out,
                        "{:<6}  {:<width$}  {}  {}",
                        "ok",
                        name,
                        done.output.display(),
                        done.digest.short()
                    );
                }
                Err(e) => {
                    let _ = writeln!(out, "{:<6}  {:<width$}  {}: {}", "FAILED", name, e.kind(), e);
                }
            }
        }
        let _ = writeln!(
            out,
            "\n{} files: {} converted, {} failed",
            self.outcomes.len(),
            self.succeeded(),
            self.failed()
        );
        out
    }
}
