//! Single-file conversion pipeline
//!
//! Source file → blocks → bundle bytes → output file, with the digest of
//! what was written.

use std::path::{Path, PathBuf};

use thiserror::Error;

use pagesdoc_ast::ErrorKind;
use pagesdoc_bundle::{
    digest, serialize, write_bundle, BundleDigest, BundleError, DocumentMeta, StyleTable,
};
use pagesdoc_core::{load_blocks, SourceError};

/// Extension given to converted documents
pub const BUNDLE_EXTENSION: &str = "pages";

/// Errors from converting one document
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Reading or classifying the source failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Building, packaging or writing the bundle failed
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

impl ConversionError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Source(e) => e.kind(),
            ConversionError::Bundle(e) => e.kind(),
        }
    }
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Where the bundle was written
    pub output: PathBuf,
    /// Digest of the written bytes
    pub digest: BundleDigest,
    /// Number of paragraphs in the document
    pub blocks: usize,
    /// Bundle size in bytes
    pub bytes: usize,
}

/// Converts source files using one style table and one set of metadata.
///
/// Holds only shared references and owned immutable data, so a single
/// converter can be used from many worker threads at once.
#[derive(Debug, Clone)]
pub struct Converter<'a> {
    styles: &'a StyleTable,
    meta: DocumentMeta,
}

impl<'a> Converter<'a> {
    /// Create a converter
    pub fn new(styles: &'a StyleTable, meta: DocumentMeta) -> Self {
        Self { styles, meta }
    }

    /// Convert `input` and write the bundle to `output`
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConversionOutcome, ConversionError> {
        if input == output {
            return Err(SourceError::UnsupportedInput(format!(
                "output would overwrite input: {}",
                input.display()
            ))
            .into());
        }

        let blocks = load_blocks(input)?;
        let bytes = serialize(&blocks, self.styles, self.meta.clone())?;
        write_bundle(output, &bytes)?;

        let outcome = ConversionOutcome {
            output: output.to_path_buf(),
            digest: digest(&bytes),
            blocks: blocks.len(),
            bytes: bytes.len(),
        };
        tracing::debug!(
            "Converted {} -> {} ({} blocks, {})",
            input.display(),
            output.display(),
            outcome.blocks,
            outcome.digest.short()
        );
        Ok(outcome)
    }
}

/// Default output for `input`: same path with a `.pages` extension
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(BUNDLE_EXTENSION)
}
