//! Arena-backed document
//!
//! Provides [`Document`], an exclusively owned tree whose nodes live in one
//! `Vec` and refer to each other by [`NodeId`].
//!
//! # Invariants
//! - Index 0 is the document node; it has no parent.
//! - Nodes are never removed, so a `NodeId` stays valid for the life of
//!   its document. Appending never invalidates ids held by callers.
//! - Only document and element nodes own children.

use crate::error::TreeError;
use crate::name::is_xml_name;
use crate::node::{Element, Node, NodeKind};
use std::fmt::{self, Display, Formatter};

/// Index of a node within its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(usize);

impl NodeId {
    /// Build an id from a raw arena index
    ///
    /// Ids not produced by a document are reported as
    /// [`TreeError::UnknownNode`] when used.
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Mutable, ordered, rooted markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    doctype: Option<String>,
}

impl Document {
    /// Create a document holding only the document node
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document, None)],
            doctype: None,
        }
    }

    /// Create a document with a single root element
    ///
    /// The name is taken as-is; use [`Document::append_element`] for
    /// validated names.
    #[must_use]
    pub fn with_root(name: impl Into<String>) -> Self {
        let mut doc = Self::new();
        doc.push(Self::ROOT, NodeKind::Element(Element::new(name)));
        doc
    }

    const ROOT: NodeId = NodeId(0);

    /// The document node
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// First element child of the document node
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(Self::ROOT).next()
    }

    /// Raw DOCTYPE body (without `<!DOCTYPE` and `>`)
    #[inline]
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Replace the DOCTYPE body
    #[inline]
    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// Number of nodes in the arena, document node included
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether `id` belongs to this document
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Node at `id`
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Element payload at `id`, `None` for unknown ids and non-elements
    #[inline]
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(|node| node.kind.as_element())
    }

    /// Mutable element payload at `id`
    #[inline]
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Tag name of the element at `id`
    ///
    /// Returns `None` for unknown ids and for non-element nodes, so the
    /// result can be compared against a tag without false positives.
    #[inline]
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    /// Parent of `id`
    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// All children of `id`; empty for unknown ids
    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Element children of `id`, in order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.element(child).is_some())
    }

    /// Pre-order iterator over the descendants of `id` (excluding `id`)
    #[inline]
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Append a node as the last child of `parent`
    ///
    /// # Errors
    /// - `TreeError::UnknownNode` if `parent` is not in this document
    /// - `TreeError::CannotHaveChildren` if `parent` is not a container
    /// - `TreeError::DocumentNodeNotAllowed` if `kind` is a document node
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, TreeError> {
        if matches!(kind, NodeKind::Document) {
            return Err(TreeError::DocumentNodeNotAllowed);
        }
        let parent_node = self.node(parent).ok_or(TreeError::UnknownNode(parent))?;
        if !parent_node.kind.is_container() {
            return Err(TreeError::CannotHaveChildren {
                node: parent,
                tag: parent_node.tag().to_string(),
            });
        }
        Ok(self.push(parent, kind))
    }

    /// Append a new, attribute-less element as the last child of `parent`
    ///
    /// # Errors
    /// - `TreeError::InvalidName` if `name` is not an XML name
    /// - Any error from [`Document::append`]
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        if !is_xml_name(name) {
            return Err(TreeError::InvalidName(name.to_string()));
        }
        self.append(parent, NodeKind::Element(Element::new(name)))
    }

    /// Set one attribute on the element at `id`, returning the previous value
    ///
    /// # Errors
    /// - `TreeError::UnknownNode` if `id` is not in this document
    /// - `TreeError::NotAnElement` if `id` is not an element
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::UnknownNode(id));
        }
        let element = self.element_mut(id).ok_or(TreeError::NotAnElement(id))?;
        Ok(element.set_attribute(key, value))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order descendant iterator, see [`Document::descendants`]
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
