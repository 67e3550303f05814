//! Markdown classification
//!
//! Line based, covering the subset the converter styles:
//!
//! - `# Title` becomes a Title block
//! - `## Heading` / `### Heading` become Heading blocks (levels 2 and 3)
//! - list items (`-`, `*`, `+`, `1.`) become Body blocks prefixed with `• `
//! - every other non-blank line becomes a Body block
//!
//! Blank lines and thematic breaks separate blocks without producing one.
//! Emphasis markers are removed; fenced code is kept verbatim as Body.

use std::sync::OnceLock;

use pagesdoc_ast::Block;
use regex::Regex;

use crate::error::Result;
use crate::source::normalize_line_endings;

/// Prefix given to list item text
pub const BULLET: &str = "• ";

/// Classify Markdown source into blocks
pub fn classify_markdown(text: &str) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut in_fence = false;

    for line in normalize_line_endings(text).lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            if !trimmed.is_empty() {
                blocks.push(Block::body(line.trim_end()));
            }
            continue;
        }

        if let Some(block) = classify_line(trimmed)? {
            blocks.push(block);
        }
    }

    Ok(blocks)
}

/// Classify one trimmed line outside fenced code
fn classify_line(line: &str) -> Result<Option<Block>> {
    if line.is_empty() || is_thematic_break(line) {
        return Ok(None);
    }

    let hashes = line.chars().take_while(|&c| c == '#').count();
    if (1..=3).contains(&hashes) {
        let text = strip_emphasis(strip_closing_hashes(line[hashes..].trim()));
        if text.is_empty() {
            return Ok(None);
        }
        let block = if hashes == 1 {
            Block::title(text)
        } else {
            Block::heading(hashes as u8, text)?
        };
        return Ok(Some(block));
    }

    if let Some(item) = list_item(line) {
        return Ok(Some(Block::body(format!("{}{}", BULLET, strip_emphasis(item)))));
    }

    let line = match line.strip_prefix('>') {
        Some(quoted) => quoted.trim(),
        None => line,
    };
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(Block::body(strip_emphasis(line))))
}

/// Remove an ATX closing sequence (`## Heading ##`)
fn strip_closing_hashes(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() || without.ends_with(char::is_whitespace) {
        without.trim_end()
    } else {
        text
    }
}

fn is_thematic_break(line: &str) -> bool {
    static BREAK_RE: OnceLock<Regex> = OnceLock::new();
    let re = BREAK_RE
        .get_or_init(|| Regex::new(r"^(?:(?:\*\s*){3,}|(?:-\s*){3,}|(?:_\s*){3,})$").unwrap());
    re.is_match(line)
}

/// Text of a list item, without its marker
fn list_item(line: &str) -> Option<&str> {
    static ITEM_RE: OnceLock<Regex> = OnceLock::new();
    let re = ITEM_RE.get_or_init(|| Regex::new(r"^(?:[-*+]|\d{1,9}[.)])\s+(.*)$").unwrap());
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Remove `**strong**`, `__strong__`, `*em*` and `_em_` markers
pub fn strip_emphasis(text: &str) -> String {
    static STRONG_RE: OnceLock<Regex> = OnceLock::new();
    static STAR_EM_RE: OnceLock<Regex> = OnceLock::new();
    static UNDERSCORE_EM_RE: OnceLock<Regex> = OnceLock::new();

    let strong = STRONG_RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
    let star_em =
        STAR_EM_RE.get_or_init(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());
    let underscore_em = UNDERSCORE_EM_RE
        .get_or_init(|| Regex::new(r"\b_([^_\s](?:[^_]*[^_\s])?)_\b").unwrap());

    let text = strong.replace_all(text, "${1}${2}");
    let text = star_em.replace_all(&text, "${1}");
    underscore_em.replace_all(&text, "${1}").into_owned()
}
