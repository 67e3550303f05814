//! Integrity verification
//!
//! A bundle's digest is SHA-256 over its complete bytes. Two conversions
//! of the same input must produce the same digest.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::archive::BundleArchive;
use crate::error::Result;

/// Length of the short digest form, in hex digits
pub const SHORT_HEX_LEN: usize = 16;

/// SHA-256 digest of a bundle
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BundleDigest([u8; 32]);

impl BundleDigest {
    /// Full lowercase hex form (64 digits)
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Short hex form (first 16 digits)
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_HEX_LEN);
        hex
    }

    /// Compare against a recorded digest in full or short hex form
    pub fn matches(&self, recorded: &str) -> bool {
        let recorded = recorded.trim().to_ascii_lowercase();
        match recorded.len() {
            64 => recorded == self.to_hex(),
            SHORT_HEX_LEN => recorded == self.short(),
            _ => false,
        }
    }
}

impl fmt::Display for BundleDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BundleDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BundleDigest({})", self.short())
    }
}

impl Serialize for BundleDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Digest of bundle bytes
pub fn digest(bytes: &[u8]) -> BundleDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    BundleDigest(hasher.finalize().into())
}

/// Digest of a bundle file
pub fn digest_file(path: &Path) -> Result<BundleDigest> {
    let bytes = fs::read(path)?;
    Ok(digest(&bytes))
}

/// Outcome of checking a bundle against a recorded digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Digest matches
    Match,
    /// Digest differs
    Mismatch {
        /// Digest actually computed
        actual: BundleDigest,
    },
}

impl Verification {
    /// Whether the digests matched
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Match)
    }
}

/// Recompute a bundle file's digest and compare with a recorded value
pub fn verify_file(path: &Path, recorded: &str) -> Result<Verification> {
    let actual = digest_file(path)?;
    if actual.matches(recorded) {
        Ok(Verification::Match)
    } else {
        log::debug!(
            "Digest mismatch for {}: recorded {}, actual {}",
            path.display(),
            recorded.trim(),
            actual
        );
        Ok(Verification::Mismatch { actual })
    }
}

/// A difference between two bundles, by member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", content = "member", rename_all = "snake_case")]
pub enum MemberDiff {
    /// Present in both with different content
    Changed(String),
    /// Present only in the first bundle
    OnlyInLeft(String),
    /// Present only in the second bundle
    OnlyInRight(String),
}

impl fmt::Display for MemberDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberDiff::Changed(name) => write!(f, "~ {}", name),
            MemberDiff::OnlyInLeft(name) => write!(f, "- {}", name),
            MemberDiff::OnlyInRight(name) => write!(f, "+ {}", name),
        }
    }
}

/// List members that differ between two bundles
///
/// Diagnostic only; equal digests are what determinism is judged by.
pub fn compare_bundles(left: &[u8], right: &[u8]) -> Result<Vec<MemberDiff>> {
    let left = BundleArchive::from_reader(Cursor::new(left))?;
    let right = BundleArchive::from_reader(Cursor::new(right))?;

    let mut diffs = Vec::new();
    for (name, contents) in left.members() {
        match right.get(name) {
            Some(other) if other == contents => {}
            Some(_) => diffs.push(MemberDiff::Changed(name.to_string())),
            None => diffs.push(MemberDiff::OnlyInLeft(name.to_string())),
        }
    }
    for name in right.names() {
        if left.get(name).is_none() {
            diffs.push(MemberDiff::OnlyInRight(name.to_string()));
        }
    }
    Ok(diffs)
}
