//! Error types for XML ingress and egress
//!
//! Provides error handling for:
//! - Parse operations (bytes → Document)
//! - Serialize operations (Document → bytes)
//! - File reads and writes around both

use std::path::PathBuf;
use tintmark_tree::TreeError;

/// Errors while reading or parsing a document (ingress)
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed markup
    #[error("syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Element name is not an XML name
    #[error("invalid element name: `{0}`")]
    InvalidName(String),

    /// Attribute could not be read or unescaped
    #[error("malformed attribute on `{element}`: {message}")]
    MalformedAttribute { element: String, message: String },

    /// Input bytes are not UTF-8
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// DOCTYPE declares entities; they are never expanded
    #[error("entity declarations are not allowed: external entity resolution is disabled")]
    EntityDeclaration,

    /// Input ended inside an element
    #[error("element `{0}` is never closed")]
    UnclosedElement(String),

    /// No element at document level
    #[error("document has no root element")]
    NoRootElement,

    /// A second element at document level
    #[error("document has more than one root element (second: `{0}`)")]
    MultipleRoots(String),

    /// Non-whitespace text or CDATA at document level
    #[error("character data outside the root element at line {line}")]
    ContentOutsideRoot { line: usize },

    /// Tree rejected a node
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file exceeds the configured limit
    #[error("file too large: {path} is {size} bytes (max: {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

impl ParseError {
    /// Create syntax error at a position
    pub fn syntax_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while rendering or writing a document (egress)
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// Markup writer failed
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// Rendered bytes are not UTF-8
    #[error("rendered document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// IO error during file write
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SerializeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined layer error
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("serialize error: {0}")]
    Serialize(#[from] SerializeError),
}

/// Result type alias for layer operations
pub type LayerResult<T> = Result<T, LayerError>;
