//! Error types for tree mutation and queries

use crate::document::NodeId;

/// Errors raised when mutating or addressing a [`Document`](crate::Document)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Node id does not belong to this document
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// Operation requires an element node
    #[error("{0} is not an element")]
    NotAnElement(NodeId),

    /// Text-like nodes are always leaves
    #[error("{node} (`{tag}`) cannot have children")]
    CannotHaveChildren { node: NodeId, tag: String },

    /// Only one document node exists, at the arena root
    #[error("document nodes cannot be appended")]
    DocumentNodeNotAllowed,

    /// Element names must be XML names
    #[error("invalid element name: '{0}'")]
    InvalidName(String),
}

/// Errors from compiling a [`DescendantQuery`](crate::DescendantQuery)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Query text was empty or only an axis prefix
    #[error("query is empty")]
    Empty,

    /// Query uses syntax beyond a single descendant-axis step
    #[error("unsupported query syntax: '{0}' (expected `.//Tag`)")]
    Unsupported(String),

    /// Step is not a valid tag name
    #[error("invalid tag name in query: '{0}'")]
    InvalidName(String),
}
