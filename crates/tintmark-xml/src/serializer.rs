//! XML serializer (egress)
//!
//! Renders a [`Document`] back to markup with quick-xml. Untouched nodes and
//! attribute values come out as they went in (modulo quoting and escaping);
//! childless elements are written as self-closing tags.

use crate::error::SerializeError;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tintmark_tree::{Document, NodeId, NodeKind};

/// Output formatting options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first
    pub declaration: bool,
    /// Re-indent with this many spaces; whitespace-only text is dropped
    pub indent: Option<usize>,
}

impl SerializeOptions {
    /// With XML declaration
    #[inline]
    #[must_use]
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    /// With indentation width
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }
}

/// [`Document`] to XML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer {
    options: SerializeOptions,
}

impl XmlSerializer {
    /// Create serializer with options
    #[inline]
    #[must_use]
    pub fn new(options: SerializeOptions) -> Self {
        Self { options }
    }

    /// Active options
    #[inline]
    #[must_use]
    pub fn options(&self) -> SerializeOptions {
        self.options
    }

    /// Render to bytes
    ///
    /// # Errors
    /// Returns `SerializeError::SerializationFailed` if the writer fails
    pub fn serialize(&self, doc: &Document) -> Result<Vec<u8>, SerializeError> {
        let mut writer = match self.options.indent {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };

        if self.options.declaration {
            write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        if let Some(doctype) = doc.doctype() {
            write(&mut writer, Event::DocType(BytesText::from_escaped(doctype)))?;
        }
        for &child in doc.children(doc.root()) {
            self.write_node(&mut writer, doc, child)?;
        }

        let mut bytes = writer.into_inner();
        if self.options.indent.is_some() && !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }

    /// Render to a string
    ///
    /// # Errors
    /// See [`XmlSerializer::serialize`]
    pub fn serialize_to_string(&self, doc: &Document) -> Result<String, SerializeError> {
        Ok(String::from_utf8(self.serialize(doc)?)?)
    }

    /// Pre-order walk with an explicit stack; end tags are queued behind
    /// their children.
    fn write_node(
        &self,
        writer: &mut Writer<Vec<u8>>,
        doc: &Document,
        id: NodeId,
    ) -> Result<(), SerializeError> {
        let mut pending = vec![Step::Open(id)];

        while let Some(step) = pending.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(name) => {
                    write(writer, Event::End(BytesEnd::new(name)))?;
                    continue;
                }
            };
            let Some(node) = doc.node(id) else {
                continue;
            };

            match node.kind() {
                NodeKind::Document => {}
                NodeKind::Element(element) => {
                    let mut start = BytesStart::new(element.name());
                    for (key, value) in element.attributes() {
                        start.push_attribute(Attribute {
                            key: QName(key.as_bytes()),
                            value: Cow::Owned(escape_attribute(value).into_owned().into_bytes()),
                        });
                    }

                    let children: Vec<NodeId> = node
                        .children()
                        .iter()
                        .copied()
                        .filter(|&child| !self.skips(doc, child))
                        .collect();

                    if children.is_empty() {
                        write(writer, Event::Empty(start))?;
                    } else {
                        write(writer, Event::Start(start))?;
                        pending.push(Step::Close(element.name()));
                        pending.extend(children.into_iter().rev().map(Step::Open));
                    }
                }
                NodeKind::Text(text) => {
                    if !self.skips(doc, id) {
                        write(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?;
                    }
                }
                NodeKind::CData(text) => write(writer, Event::CData(BytesCData::new(text.as_str())))?,
                NodeKind::Comment(text) => {
                    write(writer, Event::Comment(BytesText::from_escaped(text.as_str())))?;
                }
                NodeKind::ProcessingInstruction(body) => {
                    write(writer, Event::PI(BytesPI::new(body.as_str())))?;
                }
            }
        }
        Ok(())
    }

    /// Whitespace-only text is dropped when re-indenting
    fn skips(&self, doc: &Document, id: NodeId) -> bool {
        if self.options.indent.is_none() {
            return false;
        }
        matches!(
            doc.node(id).map(|node| node.kind()),
            Some(NodeKind::Text(text)) if text.trim().is_empty()
        )
    }
}

/// Serialize a document with the given options
///
/// # Errors
/// See [`XmlSerializer::serialize`]
#[inline]
pub fn serialize_document(doc: &Document, options: SerializeOptions) -> Result<Vec<u8>, SerializeError> {
    XmlSerializer::new(options).serialize(doc)
}

/// Pending work of the writer walk
enum Step<'a> {
    Open(NodeId),
    Close(&'a str),
}

/// Escape an attribute value for double-quoted output
///
/// Besides markup characters, tab, newline and carriage return become
/// character references; readers would otherwise normalize them to spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SerializeError> {
    writer
        .write_event(event)
        .map_err(|err| SerializeError::SerializationFailed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::XmlParser;
    use pretty_assertions::assert_eq;

    fn round_trip(input: &str, options: SerializeOptions) -> String {
        let doc = XmlParser::new().parse(input).unwrap();
        XmlSerializer::new(options).serialize_to_string(&doc).unwrap()
    }

    #[test]
    fn default_output_has_no_declaration() {
        let out = round_trip("<?xml version=\"1.0\"?><Root><A x=\"1\"/></Root>", SerializeOptions::default());
        assert_eq!(out, "<Root><A x=\"1\"/></Root>");
    }

    #[test]
    fn declaration_is_optional() {
        let options = SerializeOptions::default().with_declaration(true);
        let out = round_trip("<Root/>", options);
        assert_eq!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Root/>");
    }

    #[test]
    fn preserves_mixed_content_and_whitespace() {
        let input = "<Root>\n  <A>text &amp; more</A>\n  <!-- c --><![CDATA[<x>]]>\n</Root>";
        assert_eq!(round_trip(input, SerializeOptions::default()), input);
    }

    #[test]
    fn escapes_attribute_values() {
        let mut doc = Document::with_root("Root");
        let root = doc.document_element().unwrap();
        doc.set_attribute(root, "q", "a \"b\" <c>").unwrap();
        let out = XmlSerializer::default().serialize_to_string(&doc).unwrap();
        assert_eq!(out, "<Root q=\"a &quot;b&quot; &lt;c&gt;\"/>");
    }

    #[test]
    fn attribute_whitespace_survives_as_character_references() {
        let input = "<R a=\"x&#10;y&#9;z&#13;\" b=\"plain\"/>";
        assert_eq!(round_trip(input, SerializeOptions::default()), input);

        let doc = XmlParser::new().parse(input).unwrap();
        let root = doc.document_element().unwrap();
        assert_eq!(doc.element(root).unwrap().attribute("a"), Some("x\ny\tz\r"));
    }

    #[test]
    fn escape_attribute_leaves_plain_values_borrowed() {
        assert!(matches!(escape_attribute("128"), Cow::Borrowed("128")));
        assert_eq!(escape_attribute("a\tb & c"), "a&#9;b &amp; c");
    }

    #[test]
    fn deep_nesting_is_written_without_recursion() {
        const DEPTH: usize = 200_000;
        let mut doc = Document::with_root("Root");
        let mut current = doc.document_element().unwrap();
        for _ in 0..DEPTH {
            current = doc.append_element(current, "Wrap").unwrap();
        }

        let out = XmlSerializer::default().serialize_to_string(&doc).unwrap();

        assert!(out.starts_with("<Root><Wrap><Wrap>"));
        assert!(out.ends_with("</Wrap></Wrap></Root>"));
        assert_eq!(out.matches("<Wrap>").count(), DEPTH - 1);
        assert_eq!(out.matches("<Wrap/>").count(), 1);
    }

    #[test]
    fn indent_drops_whitespace_text() {
        let options = SerializeOptions::default().with_indent(Some(2));
        let out = round_trip("<Root>\n<A/>   <B><C/></B></Root>", options);
        assert_eq!(out, "<Root>\n  <A/>\n  <B>\n    <C/>\n  </B>\n</Root>\n");
    }

    #[test]
    fn doctype_and_processing_instructions_survive() {
        let input = "<!DOCTYPE Root><?style sheet?><Root/>";
        assert_eq!(round_trip(input, SerializeOptions::default()), input);
    }

    #[test]
    fn serialize_document_free_function() {
        let doc = Document::with_root("Root");
        let bytes = serialize_document(&doc, SerializeOptions::default()).unwrap();
        assert_eq!(bytes, b"<Root/>");
    }
}
