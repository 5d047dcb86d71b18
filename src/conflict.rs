//! Structural inconsistencies found in location mentions.
//!
//! Conflicts are reported, not repaired: a row in the location report lists
//! every conflict detected for its canonical name so the record author can
//! fix the source notes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;

/// How strongly two location names are believed to denote the same place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkConfidence {
    /// Weak textual similarity.
    Low,
    /// One edit apart.
    Medium,
    /// Structurally certain, e.g. a path leaf.
    High,
}

impl LinkConfidence {
    /// Confidence for a near-duplicate pair at `distance` edits.
    #[must_use]
    pub const fn for_distance(distance: usize) -> Self {
        if distance <= 1 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for LinkConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Why two report rows are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// A standalone name is the leaf of a qualified path.
    QualifiedPath,
    /// Names within the fuzzy distance budget.
    LikelySame,
}

/// A "probably the same place" link from one row to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLink {
    /// Display name of the other row.
    pub target: String,
    /// Why the rows are linked.
    pub kind: LinkKind,
    /// How sure the link is.
    pub confidence: LinkConfidence,
}

/// Discriminant of [`LocationConflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// See [`LocationConflict::CaseVariant`].
    CaseVariant,
    /// See [`LocationConflict::TrailingArtifact`].
    TrailingArtifact,
    /// See [`LocationConflict::AmbiguousStandalone`].
    AmbiguousStandalone,
    /// See [`LocationConflict::InconsistentHierarchy`].
    InconsistentHierarchy,
    /// See [`LocationConflict::NearDuplicate`].
    NearDuplicate,
    /// See [`LocationConflict::TypeMismatch`].
    TypeMismatch,
}

/// A detected inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationConflict {
    /// A spelling differing from the display form only by letter case.
    CaseVariant {
        /// The case-differing spelling.
        spelling: String,
    },

    /// A spelling carrying trailing decoration (`*`, `?`, ...).
    TrailingArtifact {
        /// The decorated spelling.
        spelling: String,
    },

    /// A standalone name that is also the leaf of qualified paths.
    AmbiguousStandalone {
        /// Display forms of the matching paths.
        qualified_paths: Vec<String>,
    },

    /// A segment recorded under more than one parent.
    InconsistentHierarchy {
        /// Display form of the segment.
        segment: String,
        /// Display forms of its parents.
        parents: Vec<String>,
    },

    /// Another standalone name within the fuzzy budget.
    NearDuplicate {
        /// Display form of the other row.
        other: String,
        /// Edit distance between the keys.
        distance: usize,
        /// Derived from `distance`.
        confidence: LinkConfidence,
    },

    /// The name resolves to a registered entity that is not a location.
    TypeMismatch {
        /// Canonical name of the entity.
        entity: String,
        /// Its registered type.
        entity_type: EntityType,
    },
}

impl LocationConflict {
    /// The variant without its payload.
    #[must_use]
    pub const fn kind(&self) -> ConflictKind {
        match self {
            Self::CaseVariant { .. } => ConflictKind::CaseVariant,
            Self::TrailingArtifact { .. } => ConflictKind::TrailingArtifact,
            Self::AmbiguousStandalone { .. } => ConflictKind::AmbiguousStandalone,
            Self::InconsistentHierarchy { .. } => ConflictKind::InconsistentHierarchy,
            Self::NearDuplicate { .. } => ConflictKind::NearDuplicate,
            Self::TypeMismatch { .. } => ConflictKind::TypeMismatch,
        }
    }
}

impl fmt::Display for LocationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaseVariant { spelling } => write!(f, "case_variant({spelling})"),
            Self::TrailingArtifact { spelling } => write!(f, "trailing_artifact({spelling})"),
            Self::AmbiguousStandalone { qualified_paths } => {
                write!(f, "ambiguous_standalone({})", qualified_paths.join(", "))
            }
            Self::InconsistentHierarchy { segment, parents } => {
                write!(f, "inconsistent_hierarchy({segment} under {})", parents.join(", "))
            }
            Self::NearDuplicate {
                other,
                distance,
                confidence,
            } => write!(f, "near_duplicate({other}, distance {distance}, {confidence})"),
            Self::TypeMismatch {
                entity,
                entity_type,
            } => write!(f, "type_mismatch({entity} is a {entity_type})"),
        }
    }
}
