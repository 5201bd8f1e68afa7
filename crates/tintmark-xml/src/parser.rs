//! XML parser (ingress)
//!
//! Uses quick-xml to build a [`Document`] from markup.
//!
//! # Security
//! - No DTD processing: entity declarations are rejected outright, so no
//!   external entity is ever resolved.
//! - Only the predefined entities and character references are expanded;
//!   any other entity reference is a syntax error.
//!
//! # Fidelity
//! - Text, CDATA, comments and processing instructions are kept.
//! - The XML declaration is dropped; the serializer re-emits one on request.
//! - Duplicate attributes resolve last-write-wins.

use crate::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use tintmark_tree::{is_xml_name, Document, Element, NodeId, NodeKind};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// XML to [`Document`] parser
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl XmlParser {
    /// Create new XML parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse raw bytes (UTF-8, optional BOM)
    ///
    /// # Errors
    /// - `ParseError::Encoding` if the bytes are not UTF-8
    /// - Any error from [`XmlParser::parse`]
    pub fn parse_bytes(&self, input: &[u8]) -> Result<Document, ParseError> {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        self.parse(std::str::from_utf8(input)?)
    }

    /// Parse markup text
    ///
    /// # Errors
    /// - `ParseError::SyntaxError` for malformed markup
    /// - `ParseError::EntityDeclaration` if the DOCTYPE declares entities
    /// - `ParseError::NoRootElement` / `ParseError::MultipleRoots`
    /// - `ParseError::ContentOutsideRoot` for text at document level
    /// - `ParseError::UnclosedElement` if input ends inside an element
    pub fn parse(&self, input: &str) -> Result<Document, ParseError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(false);

        let mut doc = Document::new();
        let mut stack: Vec<NodeId> = vec![doc.root()];

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let (line, column) = line_col(input, reader.error_position());
                    return Err(ParseError::syntax_error(line, column, err.to_string()));
                }
            };
            let parent = *stack.last().unwrap_or(&doc.root());
            let at_document_level = stack.len() == 1;

            match event {
                Event::Start(start) => {
                    let id = open_element(&mut doc, parent, &start)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    open_element(&mut doc, parent, &start)?;
                }
                Event::End(_) => {
                    if at_document_level {
                        let (line, column) = line_col(input, reader.buffer_position());
                        return Err(ParseError::syntax_error(line, column, "unexpected end tag"));
                    }
                    stack.pop();
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(|err| {
                        let (line, column) = line_col(input, reader.buffer_position());
                        ParseError::syntax_error(line, column, err.to_string())
                    })?;
                    if at_document_level {
                        reject_outside_root(input, &reader, &value)?;
                        continue;
                    }
                    doc.append(parent, NodeKind::Text(value.into_owned()))?;
                }
                Event::CData(cdata) => {
                    let value = std::str::from_utf8(&cdata)?.to_string();
                    if at_document_level {
                        reject_outside_root(input, &reader, &value)?;
                        continue;
                    }
                    doc.append(parent, NodeKind::CData(value))?;
                }
                Event::Comment(comment) => {
                    let value = std::str::from_utf8(&comment)?.to_string();
                    doc.append(parent, NodeKind::Comment(value))?;
                }
                Event::PI(pi) => {
                    let value = std::str::from_utf8(&pi)?.to_string();
                    doc.append(parent, NodeKind::ProcessingInstruction(value))?;
                }
                Event::DocType(doctype) => {
                    let body = std::str::from_utf8(&doctype)?;
                    if body.contains("<!ENTITY") {
                        return Err(ParseError::EntityDeclaration);
                    }
                    doc.set_doctype(Some(body.trim().to_string()));
                }
                Event::Decl(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(&open) = stack.get(1..).and_then(<[NodeId]>::last) {
            let name = doc.name(open).unwrap_or_default().to_string();
            return Err(ParseError::UnclosedElement(name));
        }
        if doc.document_element().is_none() {
            return Err(ParseError::NoRootElement);
        }

        tracing::debug!(nodes = doc.node_count(), "parsed document");
        Ok(doc)
    }
}

/// Parse a document from raw bytes with the default parser
///
/// # Errors
/// See [`XmlParser::parse_bytes`]
#[inline]
pub fn parse_document(input: &[u8]) -> Result<Document, ParseError> {
    XmlParser::new().parse_bytes(input)
}

fn open_element(
    doc: &mut Document,
    parent: NodeId,
    start: &BytesStart<'_>,
) -> Result<NodeId, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    if !is_xml_name(&name) {
        return Err(ParseError::InvalidName(name));
    }
    if parent == doc.root() && doc.document_element().is_some() {
        return Err(ParseError::MultipleRoots(name));
    }

    let mut element = Element::new(name);
    for attribute in start.attributes().with_checks(false) {
        let attribute = attribute.map_err(|err| ParseError::MalformedAttribute {
            element: element.name().to_string(),
            message: err.to_string(),
        })?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let value: Cow<'_, str> =
            attribute
                .unescape_value()
                .map_err(|err| ParseError::MalformedAttribute {
                    element: element.name().to_string(),
                    message: format!("`{key}`: {err}"),
                })?;
        element.set_attribute(key, value.into_owned());
    }

    Ok(doc.append(parent, NodeKind::Element(element))?)
}

fn reject_outside_root(
    input: &str,
    reader: &Reader<&[u8]>,
    value: &str,
) -> Result<(), ParseError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let (line, _) = line_col(input, reader.buffer_position());
    Err(ParseError::ContentOutsideRoot { line })
}

/// 1-based line and column of a byte offset
fn line_col<T: TryInto<usize>>(input: &str, offset: T) -> (usize, usize) {
    let offset = offset.try_into().unwrap_or(usize::MAX).min(input.len());
    let prefix = input.as_bytes().get(..offset).unwrap_or_default();
    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = prefix.iter().rev().take_while(|&&b| b != b'\n').count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elements_and_attributes() {
        let doc = XmlParser::new()
            .parse(r#"<Root><Neutral Name="a &amp; b"><Origin/></Neutral></Root>"#)
            .unwrap();
        let root = doc.document_element().unwrap();
        assert_eq!(doc.name(root), Some("Root"));

        let neutral = doc.element_children(root).next().unwrap();
        assert_eq!(doc.element(neutral).unwrap().attribute("Name"), Some("a & b"));
        let origin = doc.element_children(neutral).next().unwrap();
        assert_eq!(doc.name(origin), Some("Origin"));
    }

    #[test]
    fn keeps_text_comments_and_cdata() {
        let doc = XmlParser::new()
            .parse("<R>\n  <!-- note --><![CDATA[<raw>]]>x &lt; y<?pi data?></R>")
            .unwrap();
        let root = doc.document_element().unwrap();
        let kinds: Vec<_> = doc
            .children(root)
            .iter()
            .map(|&id| doc.node(id).unwrap().kind().clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Text("\n  ".into()),
                NodeKind::Comment(" note ".into()),
                NodeKind::CData("<raw>".into()),
                NodeKind::Text("x < y".into()),
                NodeKind::ProcessingInstruction("pi data".into()),
            ]
        );
    }

    #[test]
    fn accepts_combining_characters_in_names() {
        let doc = XmlParser::new().parse("<a\u{B7}b><e\u{301}/></a\u{B7}b>").unwrap();
        let root = doc.document_element().unwrap();
        assert_eq!(doc.name(root), Some("a\u{B7}b"));
    }

    #[test]
    fn duplicate_attributes_last_write_wins() {
        let doc = XmlParser::new().parse(r#"<R a="1" b="2" a="3"/>"#).unwrap();
        let root = doc.document_element().unwrap();
        let element = doc.element(root).unwrap();
        assert_eq!(element.attribute("a"), Some("3"));
        assert_eq!(element.attributes().len(), 2);
    }

    #[test]
    fn drops_declaration_keeps_doctype() {
        let doc = XmlParser::new()
            .parse("<?xml version=\"1.0\"?>\n<!DOCTYPE Root>\n<Root/>\n")
            .unwrap();
        assert_eq!(doc.doctype(), Some("Root"));
        assert_eq!(doc.children(doc.root()).len(), 1);
    }

    #[test]
    fn rejects_entity_declarations() {
        let input = r#"<!DOCTYPE r [<!ENTITY xxe SYSTEM "file:///etc/passwd">]><r>&xxe;</r>"#;
        assert!(matches!(
            XmlParser::new().parse(input),
            Err(ParseError::EntityDeclaration)
        ));
    }

    #[test]
    fn rejects_unknown_entity_references() {
        assert!(matches!(
            XmlParser::new().parse("<r>&custom;</r>"),
            Err(ParseError::SyntaxError { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(
            XmlParser::new().parse("<a><b></a></b>"),
            Err(ParseError::SyntaxError { .. })
        ));
    }

    #[test]
    fn rejects_unclosed_root() {
        let result = XmlParser::new().parse("<a><b/>");
        assert!(matches!(
            result,
            Err(ParseError::UnclosedElement(_) | ParseError::SyntaxError { .. })
        ));
    }

    #[test]
    fn rejects_missing_and_duplicate_roots() {
        assert!(matches!(
            XmlParser::new().parse("<!-- only a comment -->"),
            Err(ParseError::NoRootElement)
        ));
        assert!(matches!(
            XmlParser::new().parse("<a/><b/>"),
            Err(ParseError::MultipleRoots(name)) if name == "b"
        ));
    }

    #[test]
    fn rejects_text_outside_root() {
        assert!(matches!(
            XmlParser::new().parse("<a/>\ntrailing"),
            Err(ParseError::ContentOutsideRoot { line: 2 })
        ));
    }

    #[test]
    fn parse_bytes_handles_bom_and_bad_utf8() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(b"<r/>");
        assert!(parse_document(&input).is_ok());

        assert!(matches!(
            parse_document(b"<r>\xFF</r>"),
            Err(ParseError::Encoding(_))
        ));
    }

    #[test]
    fn line_col_is_one_based() {
        assert_eq!(line_col("ab\ncd", 0usize), (1, 1));
        assert_eq!(line_col("ab\ncd", 4usize), (2, 2));
        assert_eq!(line_col("ab", 99u64), (1, 3));
    }
}
