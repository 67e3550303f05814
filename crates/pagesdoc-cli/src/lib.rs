//! pagesdoc CLI - Command-line interface library
//!
//! This library provides the CLI functionality for pagesdoc:
//! - Convert: one Markdown or text file to a `.pages` bundle
//! - Batch: every matching file in a directory, in parallel
//! - Verify: bundle digests and member-level comparison
//! - Blocks: inspect how a source file is classified
//!
//! # Library Usage
//!
//! ```ignore
//! use pagesdoc_cli::{convert_command, Settings};
//!
//! let settings = Settings::load(None)?;
//! let outcome = convert_command(&input, None, &settings)?;
//! println!("{}", outcome.digest.short());
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Convert one file (writes notes.pages)
//! pagesdoc convert notes.md
//!
//! # Convert a directory with four workers
//! pagesdoc batch drafts/ out/ --pattern "*.md" --jobs 4
//!
//! # Check a bundle against a recorded digest
//! pagesdoc verify out/notes.pages --expected 3f2a9c0d1b7e4a55
//! ```

pub mod app;
pub mod batch;
pub mod config;
pub mod convert;

// Re-export main entry point and types
pub use app::{batch_command, blocks_command, convert_command, verify_command};
pub use app::{init_logging, run_cli, OutputFormat};
pub use batch::{plan_batch, run_batch, BatchJob, BatchOutcome, BatchReport};
pub use config::Settings;
pub use convert::{default_output_path, ConversionError, ConversionOutcome, Converter};
