//! Error types for bundle serialization

use pagesdoc_ast::{ErrorKind, RoleError};
use thiserror::Error;

/// Errors that can occur while building, packaging or reading a bundle
#[derive(Error, Debug)]
pub enum BundleError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A block's role/level has no style
    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    /// The rendered document broke a structural invariant
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Required member not found in a bundle
    #[error("Required bundle member not found: {0}")]
    MissingMember(String),

    /// Destination is not something a bundle can be written to
    #[error("Unsupported destination: {0}")]
    UnsupportedInput(String),
}

impl BundleError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BundleError::Archive(_) | BundleError::Io(_) => ErrorKind::IoFailure,
            BundleError::Xml(_)
            | BundleError::SchemaViolation(_)
            | BundleError::MissingMember(_) => ErrorKind::SchemaViolation,
            BundleError::InvalidRole(_) => ErrorKind::InvalidRole,
            BundleError::UnsupportedInput(_) => ErrorKind::UnsupportedInput,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for BundleError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        BundleError::Xml(err.into())
    }
}

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, BundleError>;
