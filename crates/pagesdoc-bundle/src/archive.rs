//! Reading `.pages` bundles back
//!
//! Members are kept in archive order, so a reader can observe the layout
//! the packager produced.

use std::io::{Read, Seek};

use zip::read::ZipArchive;

use crate::error::{BundleError, Result};
use crate::package::{INDEX_XML, MEMBER_ORDER};

/// An unpacked bundle
#[derive(Debug, Clone)]
pub struct BundleArchive {
    /// Members in archive order
    members: Vec<(String, Vec<u8>)>,
}

impl BundleArchive {
    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut members = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            members.push((name, contents));
        }

        Ok(Self { members })
    }

    /// Get a member's contents by name
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Get a member's contents as a string
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Member names in archive order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(n, _)| n.as_str())
    }

    /// Members in archive order
    pub fn members(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.members.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the archive has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The document XML
    pub fn index_xml(&self) -> Result<&[u8]> {
        self.get(INDEX_XML)
            .ok_or_else(|| BundleError::MissingMember(INDEX_XML.to_string()))
    }

    /// Check that the required members are present, in packaging order
    pub fn check_layout(&self) -> Result<()> {
        for required in MEMBER_ORDER {
            if self.get(required).is_none() {
                return Err(BundleError::MissingMember(required.to_string()));
            }
        }
        let order: Vec<&str> = self
            .names()
            .filter(|n| MEMBER_ORDER.contains(n))
            .collect();
        if order != MEMBER_ORDER {
            return Err(BundleError::SchemaViolation(format!(
                "members out of order: {}",
                order.join(", ")
            )));
        }
        Ok(())
    }
}
