//! pagesdoc-core - Source classification
//!
//! Turns Markdown or plain-text source into the ordered block sequence
//! consumed by the bundle serializer.
//!
//! # Example
//!
//! ```
//! use pagesdoc_ast::Role;
//! use pagesdoc_core::{classify, SourceFormat};
//!
//! let blocks = classify("# Title\n\nBody text & more", SourceFormat::Markdown)?;
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(blocks[0].role(), Role::Title);
//! assert_eq!(blocks[1].text(), "Body text & more");
//! # Ok::<(), pagesdoc_core::SourceError>(())
//! ```

pub mod error;
pub mod markdown;
pub mod source;
pub mod text;

use std::path::Path;

use pagesdoc_ast::Block;

pub use error::{Result, SourceError};
pub use markdown::classify_markdown;
pub use source::{decode, normalize_line_endings, read_source, Source, SourceFormat};
pub use text::{classify_text, is_heading_line};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Classify source text into blocks according to its format
pub fn classify(text: &str, format: SourceFormat) -> Result<Vec<Block>> {
    match format {
        SourceFormat::Markdown => classify_markdown(text),
        SourceFormat::Text => classify_text(text),
    }
}

/// Read a source file and classify it
pub fn load_blocks(path: &Path) -> Result<Vec<Block>> {
    let source = read_source(path)?;
    let blocks = classify(&source.text, source.format)?;
    log::debug!(
        "Classified {} as {:?}: {} blocks",
        path.display(),
        source.format,
        blocks.len()
    );
    Ok(blocks)
}
