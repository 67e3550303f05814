//! Source file reading
//!
//! Decoding never fails: bytes that are not valid UTF-8 are read as
//! Latin-1, so the same file always yields the same text.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SourceError};

/// Input format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.md` / `.markdown`
    Markdown,
    /// Anything else
    Text,
}

impl SourceFormat {
    /// Detect the format of a path from its extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => SourceFormat::Markdown,
            _ => SourceFormat::Text,
        }
    }
}

/// A decoded source document
#[derive(Debug, Clone)]
pub struct Source {
    /// Where it was read from
    pub path: PathBuf,
    /// Detected format
    pub format: SourceFormat,
    /// Decoded text
    pub text: String,
}

/// Read and decode a source file
pub fn read_source(path: &Path) -> Result<Source> {
    if path.as_os_str().is_empty() {
        return Err(SourceError::UnsupportedInput("empty input path".to_string()));
    }
    if path.is_dir() {
        return Err(SourceError::UnsupportedInput(format!(
            "{} is a directory, expected a file",
            path.display()
        )));
    }

    let bytes = fs::read(path)?;
    Ok(Source {
        path: path.to_path_buf(),
        format: SourceFormat::from_path(path),
        text: decode(&bytes),
    })
}

/// Decode bytes as UTF-8, falling back to Latin-1
pub fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(_) => {
            log::debug!("Input is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}

/// Turn `\r\n` and lone `\r` line endings into `\n`
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
