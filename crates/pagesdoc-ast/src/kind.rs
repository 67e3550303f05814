//! Error kinds shared across the pagesdoc crates
//!
//! Each crate keeps its own error enum; every one of them maps onto this
//! closed set so callers (batch reports in particular) can tell failures
//! apart without matching on crate-specific variants.

use std::fmt;

use serde::Serialize;

/// Distinguishable failure categories of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A block role or level outside the closed enumeration
    InvalidRole,
    /// The rendered XML broke a structural invariant
    SchemaViolation,
    /// Source unreadable or destination unwritable
    IoFailure,
    /// Empty path, or a directory where a file was expected
    UnsupportedInput,
}

impl ErrorKind {
    /// Stable name used in reports
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidRole => "InvalidRole",
            ErrorKind::SchemaViolation => "SchemaViolation",
            ErrorKind::IoFailure => "IOFailure",
            ErrorKind::UnsupportedInput => "UnsupportedInput",
        }
    }

    /// Whether retrying (or fixing a path) can make the operation succeed
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::IoFailure | ErrorKind::UnsupportedInput)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ErrorKind::IoFailure.to_string(), "IOFailure");
        assert_eq!(ErrorKind::InvalidRole.to_string(), "InvalidRole");
    }

    #[test]
    fn test_recoverable() {
        assert!(ErrorKind::IoFailure.is_recoverable());
        assert!(ErrorKind::UnsupportedInput.is_recoverable());
        assert!(!ErrorKind::SchemaViolation.is_recoverable());
        assert!(!ErrorKind::InvalidRole.is_recoverable());
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&ErrorKind::SchemaViolation).unwrap();
        assert_eq!(json, "\"schema_violation\"");
    }
}
