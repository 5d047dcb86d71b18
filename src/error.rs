//! Error types for the chronicle engine.
//!
//! Only configuration-level failures are errors. Malformed annotations,
//! unresolvable names and unreadable source files are recovered inline by
//! the components that meet them and never surface here.

use thiserror::Error;

use crate::entity::EntityType;
use crate::time::FactDate;

/// Validation errors raised while constructing typed inputs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A type name outside the registry vocabulary.
    #[error("Unknown entity type: {value}")]
    UnknownEntityType {
        /// The rejected text.
        value: String,
    },

    /// A date that is neither `YYYY-MM` nor `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM or YYYY-MM-DD")]
    InvalidDate {
        /// The rejected text.
        value: String,
    },

    /// A range whose start falls after its end.
    #[error("Invalid validity range: from ({from}) must not be after to ({to})")]
    InvalidRange {
        /// Range start.
        from: FactDate,
        /// Range end.
        to: FactDate,
    },

    /// A layer priority with no layers.
    #[error("Layer priority list cannot be empty")]
    EmptyLayerPriority,
}

/// Errors that make a name index impossible to build.
#[derive(Debug, Error)]
pub enum IndexError {
    /// No entities to index.
    #[error("Entity set is empty; cannot build a name index over no data")]
    EmptyEntitySet,

    /// An entity named only by whitespace.
    #[error("Entity at position {position} has a blank canonical name")]
    BlankCanonicalName {
        /// Index in the entity list.
        position: usize,
    },

    /// Two entities share a canonical name and a type.
    #[error("Entity '{name}' is registered twice as {entity_type}")]
    DuplicateEntity {
        /// Canonical name.
        name: String,
        /// Shared type.
        entity_type: EntityType,
    },
}

/// Invalid engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed TOML.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A numeric setting above its ceiling.
    #[error("{field} must be at most {max} (got {actual})")]
    OutOfRange {
        /// Setting name.
        field: &'static str,
        /// Largest accepted value.
        max: usize,
        /// Value given.
        actual: usize,
    },
}

/// Top-level error type for the chronicle engine.
#[derive(Debug, Error)]
pub enum ChronicleError {
    /// Rejected input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Index construction failed.
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Rejected configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A registry or session log failed to load.
    #[error("Collaborator '{collaborator}' failed: {message}")]
    Collaborator {
        /// Which collaborator failed.
        collaborator: &'static str,
        /// Its error, rendered.
        message: String,
    },
}

impl ChronicleError {
    /// Creates a collaborator error.
    #[must_use]
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator,
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an index build error.
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for chronicle operations.
pub type ChronicleResult<T> = Result<T, ChronicleError>;
