//! # Chronicle - temporal fact resolution and fuzzy name indexing
//!
//! Chronicle answers questions about a hand-authored campaign world: what was
//! true about an entity on a given in-game date, which registered entity a
//! free-text mention refers to, and which location names in the session
//! notes are inconsistent with each other.
//!
//! ## Core Concepts
//!
//! - **Fact**: a value with an optional validity range, written
//!   `text (YYYY-MM[-DD]:[YYYY-MM[-DD]])`
//! - **History**: the ordered facts of one property; resolved last-wins or
//!   all-active as of a date
//! - **Layers**: registry baseline plus prioritised override layers
//! - **Name index**: exact, stem and BK-tree lookup over canonical names and
//!   aliases
//! - **Location report**: grouped location mentions with links and conflicts
//!
//! ## Usage
//!
//! ```rust
//! use chronicle::{Entity, EntityType, EngineConfig, FactDate, WorldEngine};
//!
//! let marek = Entity::new("Marek Kowalski", EntityType::Character)
//!     .with_alias("Marek")
//!     .with_override("status", ["ranny (2025-02:2025-03)"]);
//! let engine = WorldEngine::new(vec![marek], EngineConfig::default())?;
//!
//! let mut session = engine.session();
//! let entity = session.resolve_entity("Marka", Some(EntityType::Character)).unwrap();
//! let as_of: FactDate = "2025-02-10".parse()?;
//! let status = session.entity_scalar(entity, "status", Some("zdrowy"), Some(as_of));
//! assert_eq!(status.unwrap().value, "ranny");
//! # Ok::<(), chronicle::ChronicleError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Temporal core
/// Dated facts.
pub mod fact;
/// Resolving a property's facts as of a date.
pub mod history;
/// Stacking baseline values and override layers.
pub mod merge;
/// Month and day precision dates.
pub mod time;

// Entities and name lookup
/// Registered entities and their ids.
pub mod entity;
/// Exact, stem and fuzzy name lookup.
pub mod index;
/// Staged name resolution.
pub mod resolve;

// Reports
/// Location links and conflicts.
pub mod conflict;
/// Intel entry audit.
pub mod intel;
/// Location grouping and reporting.
pub mod location;

/// Engine configuration.
pub mod config;
/// The engine facade and query sessions.
pub mod engine;
/// Error types.
pub mod error;
/// Registry and session log interfaces.
pub mod registry;

pub use config::{EngineConfig, LocationReportOptions, MergeConfig, ResolverConfig};
pub use conflict::{ConflictKind, LinkConfidence, LinkKind, LocationConflict, LocationLink};
pub use engine::{QuerySession, WorldEngine};
pub use entity::{Entity, EntityId, EntitySet, EntityType};
pub use error::{ChronicleError, ChronicleResult, ConfigError, IndexError, ValidationError};
pub use fact::Fact;
pub use history::History;
pub use index::{IndexEntry, NameIndex};
pub use intel::{audit_intel, IntelFinding, IntelIssue, IntelRole};
pub use location::{build_location_report, LocationReport, LocationReportRow, LocationReporter};
pub use merge::{LayerId, LayerPriority, LayeredMerger, PropertyLayers, Quantity, ReputationEntry};
pub use registry::{
    occurrences_from_sessions, EntityRegistry, InMemoryRegistry, InMemorySessionLog, IntelEntry, LocationOccurrence,
    Provenance, SessionLog, SessionRecord,
};
pub use resolve::{NameMatch, NameResolver, Resolution, ResolutionCache, ResolutionStage};
pub use time::{DatePrecision, FactDate};
