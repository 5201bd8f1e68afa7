//! Annotation mutator
//!
//! Applies the merge policy to every candidate of a document:
//!
//! ```text
//! candidates = .//candidate_tag         (computed once)
//! for each candidate, in order:
//!     scan element children → (property?, qualifies?)
//!     !qualifies            → skip
//!     property found        → merge attributes   ("updated")
//!     create_missing        → append property    ("created")
//!     otherwise             → skip
//! ```
//!
//! # Invariants
//! - Non-qualifying candidates are never touched.
//! - Pre-existing children keep their order; a new property is appended last.
//! - Running twice yields the same tree as running once.
//! - No rollback: a failure at candidate `k` keeps mutations of `0..k`.

use crate::config::AnnotationConfig;
use crate::error::{AnnotateError, ConfigError};
use crate::predicate::{has_qualifying_descendant, locate_property_node};
use crate::report::{AnnotationReport, CandidateReport, Outcome, SkipReason};
use tintmark_tree::{DescendantQuery, Document, Element, NodeId, NodeKind, TreeError};

/// What one scan of a candidate's children found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Inspection {
    property: Option<NodeId>,
    qualifies: bool,
}

/// Validated annotation policy bound to a compiled candidate query
#[derive(Debug, Clone)]
pub struct Annotator {
    config: AnnotationConfig,
    query: DescendantQuery,
}

impl Annotator {
    /// Create annotator from configuration
    ///
    /// # Errors
    /// Returns the validation error of [`AnnotationConfig::validate`]
    pub fn new(config: AnnotationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let query = DescendantQuery::new(config.candidate_tag.clone()).map_err(|_| {
            ConfigError::InvalidTag {
                field: "candidate_tag",
                value: config.candidate_tag.clone(),
            }
        })?;
        Ok(Self { config, query })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Candidate query (`.//candidate_tag`)
    #[inline]
    #[must_use]
    pub fn query(&self) -> &DescendantQuery {
        &self.query
    }

    /// Candidate sequence for `doc`, in document order
    #[inline]
    #[must_use]
    pub fn candidates(&self, doc: &Document) -> Vec<NodeId> {
        self.query.select(doc)
    }

    /// Annotate every candidate of `doc` in place
    ///
    /// The candidate sequence is computed once up front and not refreshed
    /// after mutations.
    ///
    /// # Errors
    /// Propagates the first [`AnnotateError`]; earlier candidates stay mutated.
    pub fn annotate(&self, doc: &mut Document) -> Result<AnnotationReport, AnnotateError> {
        let candidates = self.candidates(doc);
        tracing::info!(
            query = %self.query,
            candidates = candidates.len(),
            "evaluating candidates"
        );

        let mut report = AnnotationReport::new(&self.config.candidate_tag, &self.config.property_tag);
        for (index, node) in candidates.into_iter().enumerate() {
            let outcome = self.annotate_candidate(doc, index, node)?;
            report.push(CandidateReport {
                index,
                node,
                outcome,
            });
        }

        tracing::info!(
            created = report.created(),
            updated = report.updated(),
            skipped = report.skipped(),
            "finished evaluating candidates"
        );
        Ok(report)
    }

    /// Apply the merge policy to one candidate
    ///
    /// `index` is the candidate's position in the sequence and is only used
    /// for diagnostics.
    ///
    /// # Errors
    /// - `AnnotateError::NotACandidate` if `node` is not a candidate element
    /// - `AnnotateError::Mutation` if the tree rejects the write
    pub fn annotate_candidate(
        &self,
        doc: &mut Document,
        index: usize,
        node: NodeId,
    ) -> Result<Outcome, AnnotateError> {
        if doc.name(node) != Some(self.config.candidate_tag.as_str()) {
            return Err(AnnotateError::NotACandidate {
                index,
                node,
                expected: self.config.candidate_tag.clone(),
            });
        }

        let inspection = self.inspect(doc, node);
        if !inspection.qualifies {
            tracing::debug!(
                index,
                node = %node,
                marker = self.config.marker_tag.as_deref().unwrap_or_default(),
                "skipping candidate without marker"
            );
            return Ok(Outcome::Skipped {
                reason: SkipReason::MissingMarker,
            });
        }

        match inspection.property {
            Some(property) => {
                let element = doc
                    .element_mut(property)
                    .ok_or_else(|| self.mutation_error(index, TreeError::NotAnElement(property)))?;
                element.merge_attributes(&self.config.attributes);
                tracing::info!(
                    index,
                    node = %node,
                    property = %property,
                    property_tag = %self.config.property_tag,
                    "updated property"
                );
                Ok(Outcome::Updated { property })
            }
            None if self.config.create_missing => {
                let mut element = Element::new(self.config.property_tag.clone());
                element.merge_attributes(&self.config.attributes);
                let property = doc
                    .append(node, NodeKind::Element(element))
                    .map_err(|source| self.mutation_error(index, source))?;
                tracing::info!(
                    index,
                    node = %node,
                    property = %property,
                    property_tag = %self.config.property_tag,
                    "created property"
                );
                Ok(Outcome::Created { property })
            }
            None => {
                tracing::debug!(index, node = %node, "property missing and creation disabled");
                Ok(Outcome::Skipped {
                    reason: SkipReason::CreateDisabled,
                })
            }
        }
    }

    /// Single pass over the candidate's element children
    ///
    /// Every child tagged with the property tag replaces the recorded
    /// property with the result of its walk, so the last one wins even when
    /// its walk finds nothing.
    fn inspect(&self, doc: &Document, candidate: NodeId) -> Inspection {
        let property_tag = self.config.property_tag.as_str();
        let marker = self.config.marker_tag.as_deref();

        let mut inspection = Inspection {
            property: None,
            qualifies: marker.is_none(),
        };

        for child in doc.element_children(candidate) {
            if doc.name(child) == Some(property_tag) {
                inspection.property = locate_property_node(doc, child, property_tag);
            }
            if let (false, Some(marker)) = (inspection.qualifies, marker) {
                inspection.qualifies = doc.name(child) == Some(marker)
                    || has_qualifying_descendant(doc, child, marker);
            }
        }

        inspection
    }

    fn mutation_error(&self, index: usize, source: TreeError) -> AnnotateError {
        AnnotateError::Mutation {
            index,
            candidate_tag: self.config.candidate_tag.clone(),
            property_tag: self.config.property_tag.clone(),
            source,
        }
    }
}

/// Annotate `doc` with `config` in one call
///
/// # Errors
/// Fails on invalid configuration or on the first annotation error.
pub fn annotate_document(
    doc: &mut Document,
    config: AnnotationConfig,
) -> Result<AnnotationReport, crate::Error> {
    let annotator = Annotator::new(config)?;
    Ok(annotator.annotate(doc)?)
}
