//! Bundle packaging
//!
//! A `.pages` bundle is a ZIP archive with three members, always written
//! in this order:
//!
//! 1. `index.xml` - the Pages '09 document
//! 2. `buildVersionHistory.plist` - version markers
//! 3. `QuickLook/Thumbnail.jpg` - placeholder preview
//!
//! Every member uses the same fixed options (Deflate level 6, timestamp
//! pinned to the ZIP epoch, mode 0644), so identical documents produce
//! identical bytes.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::error::{BundleError, Result};
use crate::schema::check_schema;

/// Document member
pub const INDEX_XML: &str = "index.xml";
/// Version-history member
pub const VERSION_HISTORY_PLIST: &str = "buildVersionHistory.plist";
/// Thumbnail member
pub const THUMBNAIL_JPEG: &str = "QuickLook/Thumbnail.jpg";

/// Member order of every bundle
pub const MEMBER_ORDER: [&str; 3] = [INDEX_XML, VERSION_HISTORY_PLIST, THUMBNAIL_JPEG];

/// Build number recorded in the version history
pub const BUILD_VERSION: &str = "192";
/// Pages version recorded in the version history
pub const PRODUCT_VERSION: &str = "4.0";

/// 1x1 JPEG used as the QuickLook thumbnail
pub const THUMBNAIL_BYTES: [u8; 256] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01,
    0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43,
    0x00, 0x08, 0x06, 0x06, 0x07, 0x06, 0x05, 0x08, 0x07, 0x07, 0x07, 0x09,
    0x09, 0x08, 0x0A, 0x0C, 0x14, 0x0D, 0x0C, 0x0B, 0x0B, 0x0C, 0x19, 0x12,
    0x13, 0x0F, 0x14, 0x1D, 0x1A, 0x1F, 0x1E, 0x1D, 0x1A, 0x1C, 0x1C, 0x20,
    0x24, 0x2E, 0x27, 0x20, 0x22, 0x2C, 0x23, 0x1C, 0x1C, 0x28, 0x37, 0x29,
    0x2C, 0x30, 0x31, 0x34, 0x34, 0x34, 0x1F, 0x27, 0x39, 0x3D, 0x38, 0x32,
    0x3C, 0x2E, 0x33, 0x34, 0x32, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x01,
    0x00, 0x01, 0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01,
    0xFF, 0xC4, 0x00, 0x15, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0xFF,
    0xC4, 0x00, 0x14, 0x10, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xC4, 0x00,
    0x14, 0x11, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xC4, 0x00, 0x14, 0x12,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xC4, 0x00, 0x14, 0x13, 0x01, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x01, 0x00, 0x01,
    0x03, 0x01, 0x11, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01, 0xFF, 0xDA,
    0x00, 0x0C, 0x03, 0x01, 0x00, 0x02, 0x11, 0x03, 0x11, 0x00, 0x3F, 0x00,
    0xB2, 0xC0, 0xFF, 0xD9,
];

/// Version markers written to `buildVersionHistory.plist`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMetadata {
    /// `BuildVersion` key
    pub build_version: String,
    /// `ProductVersion` key
    pub product_version: String,
}

impl Default for BundleMetadata {
    fn default() -> Self {
        Self {
            build_version: BUILD_VERSION.to_string(),
            product_version: PRODUCT_VERSION.to_string(),
        }
    }
}

impl BundleMetadata {
    /// Render the property list
    pub fn to_plist(&self) -> String {
        let mut plist = String::new();
        plist.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        plist.push_str("<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n");
        plist.push_str("<plist version=\"1.0\">\n");
        plist.push_str("<dict>\n");
        plist.push_str("    <key>BuildVersion</key>\n");
        plist.push_str(&format!(
            "    <string>{}</string>\n",
            crate::xml::escape_text(&self.build_version)
        ));
        plist.push_str("    <key>ProductVersion</key>\n");
        plist.push_str(&format!(
            "    <string>{}</string>\n",
            crate::xml::escape_text(&self.product_version)
        ));
        plist.push_str("</dict>\n");
        plist.push_str("</plist>\n");
        plist
    }
}

/// Options applied to every member
///
/// Compression and timestamp are set explicitly; library defaults use the
/// current time.
pub fn member_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(6))
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

/// Package document XML into bundle bytes
///
/// The XML is checked first; a structurally invalid document fails with
/// `SchemaViolation` and nothing is packaged.
pub fn package(xml: &[u8], metadata: &BundleMetadata) -> Result<Vec<u8>> {
    let parsed = check_schema(xml).map_err(|e| {
        log::error!("Refusing to package invalid document XML: {}", e);
        e
    })?;
    log::debug!(
        "Packaging bundle: {} paragraphs, {} styles",
        parsed.paragraphs.len(),
        parsed.styles.len()
    );

    let plist = metadata.to_plist();
    let members: [(&str, &[u8]); 3] = [
        (INDEX_XML, xml),
        (VERSION_HISTORY_PLIST, plist.as_bytes()),
        (THUMBNAIL_JPEG, &THUMBNAIL_BYTES),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = member_options();
    for (name, contents) in members {
        zip.start_file(name, options)?;
        zip.write_all(contents)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Write bundle bytes to `path`, creating parent directories
///
/// The bytes go to a temporary file next to `path` that is renamed into
/// place, so a failed write never leaves a truncated bundle behind.
pub fn write_bundle(path: &Path, bytes: &[u8]) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(BundleError::UnsupportedInput("empty output path".to_string()));
    }
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".pagesdoc-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    log::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
