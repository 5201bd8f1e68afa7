//! tintmark document tree
//!
//! Mutable, ordered, rooted markup trees stored as an arena of nodes.
//!
//! # Core Concepts
//!
//! - [`Document`]: Exclusively owned arena; nodes are addressed by [`NodeId`]
//! - [`NodeKind`]: Element, text, CDATA, comment or processing instruction
//! - [`Element`]: Tag name plus ordered, last-write-wins attribute map
//! - [`DescendantQuery`]: `.//Tag` selection in document order
//!
//! # Example
//!
//! ```rust
//! use tintmark_tree::{DescendantQuery, Document};
//!
//! let mut doc = Document::with_root("Root");
//! let root = doc.document_element().unwrap();
//! let neutral = doc.append_element(root, "Neutral").unwrap();
//! doc.append_element(neutral, "Origin").unwrap();
//!
//! let query: DescendantQuery = ".//Neutral".parse().unwrap();
//! assert_eq!(query.select(&doc), vec![neutral]);
//! ```

#![warn(unreachable_pub)]

mod document;
mod error;
mod name;
mod node;
mod query;

pub use document::{Descendants, Document, NodeId};
pub use error::{QueryError, TreeError};
pub use name::is_xml_name;
pub use node::{Element, Node, NodeKind};
pub use query::DescendantQuery;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
