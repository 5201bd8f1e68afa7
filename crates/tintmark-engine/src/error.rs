//! Error types for configuration and annotation
//!
//! Every annotation error names the candidate index and the tags involved.

use tintmark_tree::{NodeId, TreeError};

/// Invalid or unreadable annotation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Tag field left empty
    #[error("`{field}` must not be empty")]
    EmptyTag { field: &'static str },

    /// Tag field is not an XML name
    #[error("`{field}` is not a valid tag name: '{value}'")]
    InvalidTag { field: &'static str, value: String },

    /// Attribute key is not an XML name
    #[error("invalid attribute name: '{0}'")]
    InvalidAttributeName(String),

    /// `NAME=VALUE` assignment could not be split
    #[error("attribute assignment must look like NAME=VALUE, got '{0}'")]
    InvalidAssignment(String),

    /// TOML input could not be decoded
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Errors while annotating candidates
///
/// Mutations applied to earlier candidates are kept when a later one fails.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// Candidate id is unknown or names a different tag
    #[error("candidate #{index} ({node}) is not a `{expected}` element")]
    NotACandidate {
        index: usize,
        node: NodeId,
        expected: String,
    },

    /// Tree rejected the property mutation
    #[error("candidate #{index} (`{candidate_tag}`): cannot write `{property_tag}`: {source}")]
    Mutation {
        index: usize,
        candidate_tag: String,
        property_tag: String,
        #[source]
        source: TreeError,
    },
}

impl AnnotateError {
    /// Index of the candidate that failed
    #[inline]
    #[must_use]
    pub fn candidate_index(&self) -> usize {
        match self {
            Self::NotACandidate { index, .. } | Self::Mutation { index, .. } => *index,
        }
    }
}
