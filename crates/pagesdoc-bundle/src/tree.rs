//! Document tree: blocks paired with their resolved styles

use pagesdoc_ast::{Block, Role};

use crate::error::Result;
use crate::styles::{StyleDefinition, StyleTable};

/// Author written when none is configured
pub const DEFAULT_AUTHOR: &str = "Pages Converter";

/// Creation marker; a constant so output never depends on the clock
pub const CREATION_DATE: &str = "2024-01-01T12:00:00Z";

/// Pages '09 document version tag
pub const DOCUMENT_VERSION: &str = "72028102400000000";

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Author shown in the document metadata
    pub author: String,
    /// Creation marker
    pub creation_date: String,
    /// Root `version` attribute
    pub version: String,
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            creation_date: CREATION_DATE.to_string(),
            version: DOCUMENT_VERSION.to_string(),
        }
    }
}

impl DocumentMeta {
    /// Default metadata with a different author
    pub fn with_author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }
}

/// A block with its resolved style
#[derive(Debug, Clone, Copy)]
pub struct StyledBlock<'a> {
    /// The block
    pub block: &'a Block,
    /// Its style
    pub style: &'a StyleDefinition,
}

/// Ordered (block, style) pairs plus metadata, built once per conversion
#[derive(Debug)]
pub struct DocumentTree<'a> {
    blocks: Vec<StyledBlock<'a>>,
    meta: DocumentMeta,
}

impl<'a> DocumentTree<'a> {
    /// Resolve every block's style, keeping input order
    pub fn build(blocks: &'a [Block], styles: &'a StyleTable, meta: DocumentMeta) -> Result<Self> {
        let blocks = blocks
            .iter()
            .map(|block| {
                let style = styles.resolve(block.role(), block.level())?;
                Ok(StyledBlock { block, style })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { blocks, meta })
    }

    /// Styled blocks in reading order
    pub fn blocks(&self) -> &[StyledBlock<'a>] {
        &self.blocks
    }

    /// Document metadata
    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Distinct roles used, in first-use order
    pub fn used_roles(&self) -> Vec<Role> {
        let mut roles = Vec::new();
        for styled in &self.blocks {
            let role = styled.block.role();
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }
}
