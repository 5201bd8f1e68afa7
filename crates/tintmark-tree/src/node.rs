//! Node payloads stored in the document arena

use crate::document::NodeId;
use indexmap::IndexMap;

/// Tag reported for the document node
pub(crate) const DOCUMENT_TAG: &str = "#document";

/// Element payload: tag name and attributes
///
/// Attribute order is the insertion order. Setting an existing key
/// overwrites its value in place; new keys are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
}

impl Element {
    /// Create element with no attributes
    ///
    /// The name is not validated here; [`Document::append_element`](crate::Document::append_element)
    /// checks it.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute setter
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Tag name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes, in document order
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Value of one attribute
    #[inline]
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set one attribute, returning the previous value
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Merge a set of attributes (add missing, overwrite present)
    ///
    /// Keys already on the element but absent from `attributes` are kept.
    pub fn merge_attributes<'a, I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in attributes {
            self.attributes.insert(key.clone(), value.clone());
        }
    }
}

/// What a node holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Arena root; exactly one per document
    Document,
    /// Markup element
    Element(Element),
    /// Character data (unescaped)
    Text(String),
    /// `<![CDATA[...]]>` section content
    CData(String),
    /// Comment body (raw)
    Comment(String),
    /// Processing instruction body, target included (raw)
    ProcessingInstruction(String),
}

impl NodeKind {
    /// DOM-style node name
    ///
    /// Elements report their tag; other kinds report a `#`-prefixed name
    /// that can never equal a valid tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Document => DOCUMENT_TAG,
            Self::Element(element) => element.name(),
            Self::Text(_) => "#text",
            Self::CData(_) => "#cdata-section",
            Self::Comment(_) => "#comment",
            Self::ProcessingInstruction(_) => "#processing-instruction",
        }
    }

    /// Whether this kind may own children
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Document | Self::Element(_))
    }

    /// Element payload, if any
    #[inline]
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// One arena slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    #[inline]
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
        }
    }

    /// Payload
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Parent node (`None` only for the document node)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// All children, in order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// DOM-style node name, see [`NodeKind::tag`]
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        self.kind.tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attribute_overwrites_in_place() {
        let mut element = Element::new("Actor.Color")
            .with_attribute("R", "0")
            .with_attribute("X", "9");

        let previous = element.set_attribute("R", "128");
        assert_eq!(previous.as_deref(), Some("0"));

        let keys: Vec<_> = element.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["R", "X"]);
        assert_eq!(element.attribute("R"), Some("128"));
    }

    #[test]
    fn merge_keeps_unlisted_attributes() {
        let mut element = Element::new("Actor.Color")
            .with_attribute("B", "0")
            .with_attribute("X", "9");
        let mut incoming = IndexMap::new();
        incoming.insert("R".to_string(), "128".to_string());
        incoming.insert("B".to_string(), "128".to_string());

        element.merge_attributes(&incoming);

        let pairs: Vec<_> = element
            .attributes()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("B", "128"), ("X", "9"), ("R", "128")]);
    }

    #[test]
    fn non_element_tags_are_hash_prefixed() {
        assert_eq!(NodeKind::Text("x".into()).tag(), "#text");
        assert_eq!(NodeKind::Comment("x".into()).tag(), "#comment");
        assert_eq!(NodeKind::Document.tag(), "#document");
        assert!(!NodeKind::CData("x".into()).is_container());
        assert!(NodeKind::Element(Element::new("a")).is_container());
    }
}
