//! Pages '09 XML document builder
//!
//! Renders a [`DocumentTree`] into the `index.xml` member of a bundle.
//! Styles are emitted once in the `sl:styles` catalog, only for the roles
//! the document uses, and paragraphs refer to them by ID. Text is escaped
//! exactly once.
//!
//! # Example
//!
//! ```
//! use pagesdoc_ast::Block;
//! use pagesdoc_bundle::{render, DocumentMeta, DocumentTree, StyleTable};
//!
//! let blocks = vec![Block::title("Title"), Block::body("Body text & more")];
//! let styles = StyleTable::pages_default();
//! let tree = DocumentTree::build(&blocks, &styles, DocumentMeta::default())?;
//! let xml = String::from_utf8(render(&tree)).unwrap();
//!
//! assert!(xml.contains("<sf:text>Body text &amp; more</sf:text>"));
//! # Ok::<(), pagesdoc_bundle::BundleError>(())
//! ```

use quick_xml::escape::escape;

use crate::styles::{style_id, StyleTable};
use crate::tree::DocumentTree;

/// `sl` namespace (document structure)
pub const NS_SL: &str = "http://developer.apple.com/namespaces/sl";
/// `sf` namespace (shared formatting)
pub const NS_SF: &str = "http://developer.apple.com/namespaces/sf";
/// `sfa` namespace (shared formatting attributes)
pub const NS_SFA: &str = "http://developer.apple.com/namespaces/sfa";

/// Layout style referenced by the single body section
pub const LAYOUT_STYLE_ID: &str = "layout-style-0";

/// Render a document tree to UTF-8 XML bytes
pub fn render(tree: &DocumentTree<'_>) -> Vec<u8> {
    PagesXmlWriter::new().render(tree).into_bytes()
}

/// Escape text for element content or attribute values
///
/// Replaces `& < > " '` and drops characters XML 1.0 cannot carry.
/// Carriage returns become `&#xD;` so parsers do not fold them into `\n`.
pub fn escape_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    escape(cleaned.as_str()).replace('\r', "&#xD;")
}

/// Characters allowed by the XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// String-buffer writer for the document XML
struct PagesXmlWriter {
    output: String,
}

impl PagesXmlWriter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn render(mut self, tree: &DocumentTree<'_>) -> String {
        self.output.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        self.output.push('\n');
        self.output.push_str(&format!(
            r#"<sl:document xmlns:sl="{}" xmlns:sf="{}" xmlns:sfa="{}" version="{}">"#,
            NS_SL,
            NS_SF,
            NS_SFA,
            escape_text(&tree.meta().version)
        ));
        self.output.push('\n');

        self.write_metadata(tree);
        self.write_styles(tree);
        self.write_body(tree);

        self.output.push_str("</sl:document>\n");
        self.output
    }

    fn write_metadata(&mut self, tree: &DocumentTree<'_>) {
        let meta = tree.meta();
        self.output.push_str("  <sl:metadata>\n");
        self.output.push_str(&format!(
            "    <sl:author>{}</sl:author>\n",
            escape_text(&meta.author)
        ));
        self.output.push_str(&format!(
            "    <sl:creation-date>{}</sl:creation-date>\n",
            escape_text(&meta.creation_date)
        ));
        self.output.push_str("  </sl:metadata>\n");
    }

    /// One catalog entry per used role, in fixed catalog order
    fn write_styles(&mut self, tree: &DocumentTree<'_>) {
        let used = tree.used_roles();
        self.output.push_str("  <sl:styles>\n");
        for role in StyleTable::catalog_roles(&used) {
            // Every used role has at least one block carrying its style.
            let Some(style) = tree
                .blocks()
                .iter()
                .find(|s| s.block.role() == role)
                .map(|s| s.style)
            else {
                continue;
            };
            self.output.push_str(&format!(
                "    <sl:paragraph-style sfa:ID=\"{}\" sf:name=\"{}\">\n",
                style_id(role),
                escape_text(style.name)
            ));
            self.output.push_str(&format!(
                "      <sl:font sfa:fontName=\"{}\" sfa:fontSize=\"{}\"/>\n",
                escape_text(style.font_family),
                style.font_size
            ));
            self.output.push_str("    </sl:paragraph-style>\n");
        }
        self.output.push_str("  </sl:styles>\n");
    }

    fn write_body(&mut self, tree: &DocumentTree<'_>) {
        self.output.push_str("  <sl:body>\n");
        self.output.push_str("    <sl:section>\n");
        self.output.push_str(&format!(
            "      <sl:layout-style-ref sfa:IDref=\"{}\"/>\n",
            LAYOUT_STYLE_ID
        ));
        for styled in tree.blocks() {
            self.output.push_str(&format!(
                "      <sl:p sf:style=\"{}\">\n",
                style_id(styled.block.role())
            ));
            self.output.push_str(&format!(
                "        <sf:text>{}</sf:text>\n",
                escape_text(styled.block.text())
            ));
            self.output.push_str("      </sl:p>\n");
        }
        self.output.push_str("    </sl:section>\n");
        self.output.push_str("  </sl:body>\n");
    }
}
