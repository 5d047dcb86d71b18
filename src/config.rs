//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [resolver]
//! max_edit_distance = 2
//!
//! [location]
//! max_fuzzy_distance = 2
//! include_sources = true
//! scan_references = false
//! min_occurrences = 1
//!
//! [merge]
//! layer_priority = ["registry", "session_log"]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::merge::LayerPriority;

/// Name resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Edit-distance budget of the fuzzy stage. Zero disables it.
    pub max_edit_distance: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
        }
    }
}

/// Location report settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationReportOptions {
    /// Largest edit distance reported as a near-duplicate. Zero disables
    /// fuzzy dedup.
    pub max_fuzzy_distance: usize,
    /// Attach file/session/header references to each row.
    pub include_sources: bool,
    /// Re-read source files to find line numbers. Implies `include_sources`.
    pub scan_references: bool,
    /// Drop rows mentioned fewer times than this.
    pub min_occurrences: usize,
}

impl Default for LocationReportOptions {
    fn default() -> Self {
        Self {
            max_fuzzy_distance: 2,
            include_sources: true,
            scan_references: false,
            min_occurrences: 1,
        }
    }
}

/// Layered merge settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Lowest precedence first.
    pub layer_priority: LayerPriority,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name resolution settings.
    pub resolver: ResolverConfig,
    /// Location report defaults.
    pub location: LocationReportOptions,
    /// Layer stacking.
    pub merge: MergeConfig,
}

impl EngineConfig {
    /// Edit distances above this make every short name match every other.
    pub const MAX_EDIT_DISTANCE: usize = 8;

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::OutOfRange` for values that fail validation.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` if a distance budget exceeds
    /// [`EngineConfig::MAX_EDIT_DISTANCE`].
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.resolver.max_edit_distance > Self::MAX_EDIT_DISTANCE {
            return Err(ConfigError::OutOfRange {
                field: "resolver.max_edit_distance",
                max: Self::MAX_EDIT_DISTANCE,
                actual: self.resolver.max_edit_distance,
            });
        }
        if self.location.max_fuzzy_distance > Self::MAX_EDIT_DISTANCE {
            return Err(ConfigError::OutOfRange {
                field: "location.max_fuzzy_distance",
                max: Self::MAX_EDIT_DISTANCE,
                actual: self.location.max_fuzzy_distance,
            });
        }
        Ok(self)
    }
}
