//! Structural checks on rendered document XML
//!
//! The builder should never produce an invalid document; these checks
//! run before packaging so a builder bug surfaces as a `SchemaViolation`
//! instead of a bundle Pages refuses to open.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{BundleError, Result};

/// A catalog entry read back from document XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStyle {
    /// `sfa:ID`
    pub id: String,
    /// `sf:name`
    pub name: String,
}

/// A paragraph read back from document XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParagraph {
    /// `sf:style` reference
    pub style: String,
    /// Unescaped text
    pub text: String,
}

/// Content of a document XML, read back with a real XML parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Root `version` attribute
    pub version: Option<String>,
    /// Style catalog, in document order
    pub styles: Vec<ParsedStyle>,
    /// Paragraphs, in document order
    pub paragraphs: Vec<ParsedParagraph>,
}

impl ParsedDocument {
    /// Style name a paragraph refers to
    pub fn style_name(&self, paragraph: &ParsedParagraph) -> Option<&str> {
        self.styles
            .iter()
            .find(|s| s.id == paragraph.style)
            .map(|s| s.name.as_str())
    }
}

/// Parse document XML and check its structure
///
/// Fails with `SchemaViolation` when the root is not `sl:document`,
/// `sl:styles` or `sl:body` is missing or repeated, a style ID is declared
/// twice, a paragraph refers to an undeclared style, or elements are left
/// unclosed. Malformed XML fails with an XML error.
pub fn check_schema(xml: &[u8]) -> Result<ParsedDocument> {
    let mut reader = Reader::from_reader(xml);
    let mut state = ParseState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                state.open(e)?;
                state.stack.push(e.name().as_ref().to_vec());
            }
            Event::Empty(ref e) => {
                state.open(e)?;
                state.close(e.name().as_ref());
            }
            Event::End(ref e) => {
                state.stack.pop();
                state.close(e.name().as_ref());
            }
            Event::Text(ref e) => {
                if state.in_text {
                    let text = e.unescape()?;
                    if let Some(ref mut p) = state.current {
                        p.text.push_str(&text);
                    }
                }
            }
            Event::CData(ref e) => {
                if state.in_text {
                    if let Some(ref mut p) = state.current {
                        p.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    state.finish()
}

#[derive(Default)]
struct ParseState {
    doc: ParsedDocument,
    stack: Vec<Vec<u8>>,
    root_seen: bool,
    styles_count: usize,
    body_count: usize,
    current: Option<ParsedParagraph>,
    in_text: bool,
}

impl ParseState {
    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let name = e.name();
        let name = name.as_ref();

        if self.stack.is_empty() {
            if self.root_seen {
                return Err(violation("content after the root element"));
            }
            if name != b"sl:document" {
                return Err(violation(format!(
                    "root element is <{}>, expected <sl:document>",
                    String::from_utf8_lossy(name)
                )));
            }
            self.root_seen = true;
            self.doc.version = get_attr(e, b"version");
            return Ok(());
        }

        match name {
            b"sl:styles" => self.styles_count += 1,
            b"sl:body" => self.body_count += 1,
            b"sl:paragraph-style" => {
                let id = get_attr(e, b"sfa:ID")
                    .ok_or_else(|| violation("paragraph style without sfa:ID"))?;
                if self.doc.styles.iter().any(|s| s.id == id) {
                    return Err(violation(format!("duplicate style ID {}", id)));
                }
                let name = get_attr(e, b"sf:name").unwrap_or_else(|| id.clone());
                self.doc.styles.push(ParsedStyle { id, name });
            }
            b"sl:p" => {
                let style = get_attr(e, b"sf:style")
                    .ok_or_else(|| violation("paragraph without sf:style"))?;
                self.current = Some(ParsedParagraph {
                    style,
                    text: String::new(),
                });
            }
            b"sf:text" if self.current.is_some() => self.in_text = true,
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"sf:text" => self.in_text = false,
            b"sl:p" => {
                if let Some(paragraph) = self.current.take() {
                    self.doc.paragraphs.push(paragraph);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<ParsedDocument> {
        if !self.root_seen {
            return Err(violation("missing <sl:document> root"));
        }
        if let Some(open) = self.stack.last() {
            return Err(violation(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(open)
            )));
        }
        if self.styles_count != 1 {
            return Err(violation(format!(
                "expected one <sl:styles>, found {}",
                self.styles_count
            )));
        }
        if self.body_count != 1 {
            return Err(violation(format!(
                "expected one <sl:body>, found {}",
                self.body_count
            )));
        }
        for paragraph in &self.doc.paragraphs {
            if !self.doc.styles.iter().any(|s| s.id == paragraph.style) {
                return Err(violation(format!(
                    "paragraph refers to undeclared style {}",
                    paragraph.style
                )));
            }
        }
        Ok(self.doc)
    }
}

fn violation(msg: impl Into<String>) -> BundleError {
    BundleError::SchemaViolation(msg.into())
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
