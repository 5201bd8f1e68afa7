//! tintmark annotation engine
//!
//! Decides which candidate nodes of a document qualify for a property
//! element and idempotently creates or updates that element.
//!
//! # Core Operations
//!
//! - **Select**: `.//candidate_tag` over the whole document, once per run
//! - **Qualify**: [`has_qualifying_descendant`] below the candidate's children
//! - **Locate**: [`locate_property_node`] along a same-tag descent path
//! - **Merge**: update in place, create-and-append, or skip
//!
//! # Architecture
//!
//! ```text
//! Document ─→ DescendantQuery ─→ candidates ─→ Annotator ─→ Document'
//!                                                 │
//!                                   predicate::{has_qualifying_descendant,
//!                                               locate_property_node}
//! ```
//!
//! The engine performs no I/O; parsing and serialization live in
//! `tintmark-xml`.
//!
//! # Example
//!
//! ```rust
//! use tintmark_engine::{AnnotationConfig, Annotator};
//! use tintmark_tree::Document;
//!
//! let mut doc = Document::with_root("Neutral");
//! let neutral = doc.document_element().unwrap();
//! doc.append_element(neutral, "Origin").unwrap();
//!
//! let annotator = Annotator::new(AnnotationConfig::default()).unwrap();
//! let report = annotator.annotate(&mut doc).unwrap();
//! assert_eq!(report.created(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod predicate;
pub mod report;

mod annotate;

pub use annotate::{annotate_document, Annotator};
pub use config::{parse_attribute_assignment, AnnotationConfig};
pub use error::{AnnotateError, ConfigError};
pub use predicate::{find_qualifying_descendant, has_qualifying_descendant, locate_property_node};
pub use report::{AnnotationReport, CandidateReport, Outcome, SkipReason};

/// Combined engine error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Annotation failed part-way
    #[error("annotation error: {0}")]
    Annotate(#[from] AnnotateError),
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
