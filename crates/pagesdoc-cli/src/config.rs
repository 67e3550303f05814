//! Configuration Settings
//!
//! `pagesdoc.toml` layout:
//!
//! ```toml
//! [document]
//! author = "Pages Converter"
//!
//! [batch]
//! pattern = "*"
//! jobs = 0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pagesdoc_bundle::tree::DEFAULT_AUTHOR;
use pagesdoc_bundle::DocumentMeta;

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pagesdoc.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Document metadata settings
    pub document: DocumentSettings,
    /// Batch conversion settings
    pub batch: BatchSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from an explicit path, or from `./pagesdoc.toml` when present
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::read(path);
        }

        let candidate = PathBuf::from(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::read(&candidate);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Document metadata carrying the configured author
    pub fn document_meta(&self) -> DocumentMeta {
        DocumentMeta::with_author(self.document.author.clone())
    }
}

/// `[document]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Author written into every bundle
    pub author: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// `[batch]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Glob matched against file names in the input directory
    pub pattern: String,
    /// Worker threads (0 = one per CPU)
    pub jobs: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            pattern: "*".to_string(),
            jobs: 0,
        }
    }
}
