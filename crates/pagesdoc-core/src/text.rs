//! Plain-text classification
//!
//! Each non-blank line is one block. A line written entirely in capitals
//! is a Heading; everything else is Body. Lines with no letters at all
//! (digits, punctuation) are Body.

use pagesdoc_ast::Block;

use crate::error::Result;
use crate::source::normalize_line_endings;

/// Lines this long or longer are never headings
pub const MAX_HEADING_CHARS: usize = 100;

/// Level given to plain-text headings
const TEXT_HEADING_LEVEL: u8 = 2;

/// Classify plain text into blocks
pub fn classify_text(text: &str) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();

    for line in normalize_line_endings(text).lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let block = if is_heading_line(line) {
            Block::heading(TEXT_HEADING_LEVEL, line)?
        } else {
            Block::body(line)
        };
        blocks.push(block);
    }

    Ok(blocks)
}

/// Whether a line reads as an all-caps heading
///
/// Requires at least one uppercase letter and no lowercase letter;
/// whitespace, digits and punctuation are ignored.
pub fn is_heading_line(line: &str) -> bool {
    let line = line.trim();
    line.chars().count() < MAX_HEADING_CHARS
        && line.chars().any(char::is_uppercase)
        && !line.chars().any(char::is_lowercase)
}
