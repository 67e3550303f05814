//! Block-level elements of a document
//!
//! A document is an ordered sequence of [`Block`]s. Order is reading order
//! and is preserved all the way into the rendered bundle.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::kind::ErrorKind;

/// Semantic role of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Document title (Markdown `#`)
    Title,
    /// Section heading (Markdown `##`/`###`, all-caps text lines)
    Heading,
    /// Body text
    Body,
}

impl Role {
    /// All roles, in declaration order
    pub const ALL: [Role; 3] = [Role::Title, Role::Heading, Role::Body];

    /// Name of the Pages default style for this role
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Title => "Title",
            Role::Heading => "Heading",
            Role::Body => "Body",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Role::Title),
            "heading" => Ok(Role::Heading),
            "body" => Ok(Role::Body),
            _ => Err(RoleError::UnknownRole(s.to_string())),
        }
    }
}

/// Invalid role or role/level combination
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    /// Role name outside {Title, Heading, Body}
    #[error("Unknown role: {0:?}")]
    UnknownRole(String),

    /// Level that the role does not accept
    #[error("Invalid level {level:?} for role {role}")]
    InvalidLevel {
        /// Role the level was given for
        role: Role,
        /// Offending level
        level: Option<u8>,
    },
}

impl RoleError {
    /// Always [`ErrorKind::InvalidRole`]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidRole
    }
}

/// Check that `level` is one the role accepts
///
/// Title is level 1, Heading is level 2 or 3 (both share one style),
/// Body has no level. A missing level is accepted for Title and Heading.
pub fn check_level(role: Role, level: Option<u8>) -> Result<(), RoleError> {
    let ok = match (role, level) {
        (Role::Title, None | Some(1)) => true,
        (Role::Heading, None | Some(2..=3)) => true,
        (Role::Body, None) => true,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(RoleError::InvalidLevel { role, level })
    }
}

/// One semantic unit of document content
///
/// Fields are private: a block's role is fixed by the constructor that
/// created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    role: Role,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
}

impl Block {
    /// A title block (level 1)
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            role: Role::Title,
            text: text.into(),
            level: Some(1),
        }
    }

    /// A heading block; `level` must be 2 or 3
    pub fn heading(level: u8, text: impl Into<String>) -> Result<Self, RoleError> {
        check_level(Role::Heading, Some(level))?;
        Ok(Self {
            role: Role::Heading,
            text: text.into(),
            level: Some(level),
        })
    }

    /// A body block
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            role: Role::Body,
            text: text.into(),
            level: None,
        }
    }

    /// Semantic role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Plain text, not escaped
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Heading depth, if any
    pub fn level(&self) -> Option<u8> {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let title = Block::title("Intro");
        assert_eq!(title.role(), Role::Title);
        assert_eq!(title.level(), Some(1));
        assert_eq!(title.text(), "Intro");

        let body = Block::body("text");
        assert_eq!(body.role(), Role::Body);
        assert_eq!(body.level(), None);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(Block::heading(2, "A").unwrap().level(), Some(2));
        assert_eq!(Block::heading(3, "B").unwrap().level(), Some(3));

        let err = Block::heading(4, "C").unwrap_err();
        assert_eq!(
            err,
            RoleError::InvalidLevel {
                role: Role::Heading,
                level: Some(4)
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidRole);
        assert!(Block::heading(1, "D").is_err());
    }

    #[test]
    fn test_check_level() {
        assert!(check_level(Role::Title, Some(1)).is_ok());
        assert!(check_level(Role::Title, Some(2)).is_err());
        assert!(check_level(Role::Body, None).is_ok());
        assert!(check_level(Role::Body, Some(2)).is_err());
        assert!(check_level(Role::Heading, None).is_ok());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Title".parse::<Role>().unwrap(), Role::Title);
        assert_eq!(" heading ".parse::<Role>().unwrap(), Role::Heading);
        assert_eq!("BODY".parse::<Role>().unwrap(), Role::Body);

        let err = "subtitle".parse::<Role>().unwrap_err();
        assert!(matches!(err, RoleError::UnknownRole(ref s) if s == "subtitle"));
        assert_eq!(err.to_string(), "Unknown role: \"subtitle\"");
    }

    #[test]
    fn test_role_display() {
        let names: Vec<String> = Role::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["Title", "Heading", "Body"]);
    }

    #[test]
    fn test_block_serialization() {
        let json = serde_json::to_string(&Block::body("x")).unwrap();
        assert_eq!(json, r#"{"role":"body","text":"x"}"#);

        let json = serde_json::to_string(&Block::heading(2, "y").unwrap()).unwrap();
        assert_eq!(json, r#"{"role":"heading","text":"y","level":2}"#);
    }
}
