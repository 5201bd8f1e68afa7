//! Descendant-axis tag queries
//!
//! Provides [`DescendantQuery`], the only query shape the tool needs:
//! every element named `Tag` below the context node, in document order.
//!
//! # Accepted syntax
//! - `.//Tag` and `//Tag` (XPath descendant axis)
//! - bare `Tag`

use crate::document::{Document, NodeId};
use crate::error::QueryError;
use crate::name::is_xml_name;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Compiled `.//Tag` query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescendantQuery {
    tag: String,
}

impl DescendantQuery {
    /// Create query for one tag
    ///
    /// # Errors
    /// Returns `QueryError::InvalidName` if `tag` is not an XML name
    pub fn new(tag: impl Into<String>) -> Result<Self, QueryError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(QueryError::Empty);
        }
        if !is_xml_name(&tag) {
            return Err(QueryError::InvalidName(tag));
        }
        Ok(Self { tag })
    }

    /// Tag this query matches
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Evaluate against the whole document, in document order
    ///
    /// Returns an empty vector when nothing matches.
    #[must_use]
    pub fn select(&self, doc: &Document) -> Vec<NodeId> {
        doc.descendants(doc.root())
            .filter(|&id| doc.name(id) == Some(self.tag.as_str()))
            .collect()
    }
}

impl Display for DescendantQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, ".//{}", self.tag)
    }
}

impl FromStr for DescendantQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let step = trimmed
            .strip_prefix(".//")
            .or_else(|| trimmed.strip_prefix("//"))
            .unwrap_or(trimmed);

        if step.is_empty() {
            return Err(QueryError::Empty);
        }
        if step.contains(|c: char| matches!(c, '/' | '[' | ']' | '@' | '*' | '(' | ')' | '|'))
            || step.contains(char::is_whitespace)
        {
            return Err(QueryError::Unsupported(trimmed.to_string()));
        }
        Self::new(step)
    }
}
