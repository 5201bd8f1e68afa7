//! Per-run annotation report

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use tintmark_tree::NodeId;

/// Why a candidate was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No marker tag below the candidate
    MissingMarker,
    /// No property element and creation disabled
    CreateDisabled,
}

/// What happened to one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Candidate left untouched
    Skipped { reason: SkipReason },
    /// Existing property element overwritten
    Updated { property: NodeId },
    /// New property element appended
    Created { property: NodeId },
}

impl Outcome {
    /// Property element written, if any
    #[inline]
    #[must_use]
    pub fn property(&self) -> Option<NodeId> {
        match self {
            Self::Skipped { .. } => None,
            Self::Updated { property } | Self::Created { property } => Some(*property),
        }
    }

    /// Whether the document was mutated
    #[inline]
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        self.property().is_some()
    }
}

/// Outcome for one entry of the candidate sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    /// Position in the candidate sequence
    pub index: usize,
    /// Candidate node
    pub node: NodeId,
    /// Result of the merge policy
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Summary of one annotation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    /// Candidate tag queried
    pub candidate_tag: String,
    /// Property tag written
    pub property_tag: String,
    /// One entry per candidate, in candidate order
    pub candidates: Vec<CandidateReport>,
}

impl AnnotationReport {
    /// Create empty report
    #[inline]
    #[must_use]
    pub fn new(candidate_tag: impl Into<String>, property_tag: impl Into<String>) -> Self {
        Self {
            candidate_tag: candidate_tag.into(),
            property_tag: property_tag.into(),
            candidates: Vec::new(),
        }
    }

    /// Record one candidate
    #[inline]
    pub fn push(&mut self, entry: CandidateReport) {
        self.candidates.push(entry);
    }

    /// Number of candidates processed
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Number of property elements updated in place
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated { .. }))
    }

    /// Number of property elements created
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created { .. }))
    }

    /// Number of candidates skipped
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    /// Whether any candidate was mutated
    #[must_use]
    pub fn has_mutations(&self) -> bool {
        self.candidates.iter().any(|c| c.outcome.is_mutation())
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.candidates
            .iter()
            .filter(|c| predicate(&c.outcome))
            .count()
    }
}

impl Display for AnnotationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} `{}` candidate(s): {} created, {} updated, {} skipped (property `{}`)",
            self.total(),
            self.candidate_tag,
            self.created(),
            self.updated(),
            self.skipped(),
            self.property_tag
        )
    }
}
