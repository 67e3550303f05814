//! Error types for source reading

use pagesdoc_ast::{ErrorKind, RoleError};
use thiserror::Error;

/// Errors that can occur while reading a source document
#[derive(Error, Debug)]
pub enum SourceError {
    /// Error reading the source file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Empty path, or a directory where a file was expected
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Classification produced a role the block model rejects
    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),
}

impl SourceError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::Io(_) => ErrorKind::IoFailure,
            SourceError::UnsupportedInput(_) => ErrorKind::UnsupportedInput,
            SourceError::InvalidRole(_) => ErrorKind::InvalidRole,
        }
    }
}

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;
