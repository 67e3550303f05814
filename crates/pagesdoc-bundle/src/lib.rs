//! # pagesdoc-bundle
//!
//! Deterministic serializer for Apple Pages '09 document bundles.
//!
//! This crate provides functionality to:
//! - Resolve block roles to the built-in Title/Heading/Body styles
//! - Render blocks into Pages '09 `index.xml`
//! - Package the XML with its version history and thumbnail into a `.pages` archive
//! - Compute and compare bundle digests
//!
//! Identical blocks always produce byte-identical bundles: member order,
//! timestamps and compression settings are fixed.
//!
//! ## Example
//!
//! ```
//! use pagesdoc_ast::Block;
//! use pagesdoc_bundle::{digest, serialize, DocumentMeta, StyleTable};
//!
//! let styles = StyleTable::pages_default();
//! let blocks = vec![Block::title("Title"), Block::body("Body text & more")];
//!
//! let first = serialize(&blocks, &styles, DocumentMeta::default())?;
//! let second = serialize(&blocks, &styles, DocumentMeta::default())?;
//! assert_eq!(digest(&first), digest(&second));
//! # Ok::<(), pagesdoc_bundle::BundleError>(())
//! ```

pub mod archive;
pub mod error;
pub mod package;
pub mod schema;
pub mod styles;
pub mod tree;
pub mod verify;
pub mod xml;

use pagesdoc_ast::Block;

pub use archive::BundleArchive;
pub use error::{BundleError, Result};
pub use package::{package, write_bundle, BundleMetadata, MEMBER_ORDER};
pub use schema::{check_schema, ParsedDocument, ParsedParagraph, ParsedStyle};
pub use styles::{style_id, FontWeight, StyleDefinition, StyleTable};
pub use tree::{DocumentMeta, DocumentTree, StyledBlock};
pub use verify::{
    compare_bundles, digest, digest_file, verify_file, BundleDigest, MemberDiff, Verification,
};
pub use xml::{escape_text, render};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve, render and package blocks into bundle bytes
pub fn serialize(blocks: &[Block], styles: &StyleTable, meta: DocumentMeta) -> Result<Vec<u8>> {
    let tree = DocumentTree::build(blocks, styles, meta)?;
    let xml = render(&tree);
    package(&xml, &BundleMetadata::default())
}
