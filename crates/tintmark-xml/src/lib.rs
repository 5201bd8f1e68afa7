//! XML ingress and egress for tintmark documents
//!
//! - [`XmlParser`] builds a [`tintmark_tree::Document`] from markup
//! - [`XmlSerializer`] renders it back
//! - [`DocumentLayer`] is the filesystem boundary around both
//!
//! # Example
//! ```
//! use tintmark_xml::{parse_document, serialize_document, SerializeOptions};
//!
//! let doc = parse_document(b"<Root><Neutral/></Root>").unwrap();
//! let out = serialize_document(&doc, SerializeOptions::default()).unwrap();
//! assert_eq!(out, b"<Root><Neutral/></Root>");
//! ```

pub mod error;
pub mod layer;
pub mod parser;
pub mod serializer;

pub use error::{LayerError, LayerResult, ParseError, SerializeError};
pub use layer::{DocumentLayer, DEFAULT_MAX_FILE_SIZE};
pub use parser::{parse_document, XmlParser};
pub use serializer::{serialize_document, SerializeOptions, XmlSerializer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
