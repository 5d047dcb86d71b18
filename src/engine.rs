//! The engine facade.
//!
//! A [`WorldEngine`] owns a validated entity snapshot and the name index
//! built from it. Queries run through a [`QuerySession`], which borrows the
//! engine and owns the resolution cache for the duration of one request.

use crate::config::{EngineConfig, LocationReportOptions};
use crate::entity::{Entity, EntitySet, EntityType};
use crate::error::ChronicleResult;
use crate::fact::Fact;
use crate::index::NameIndex;
use crate::intel::{audit_intel, IntelFinding};
use crate::location::{LocationReport, LocationReporter, SourceReader};
use crate::merge::{LayeredMerger, PropertyLayers, Quantity, ReputationEntry};
use crate::registry::{EntityRegistry, LocationOccurrence, SessionRecord};
use crate::resolve::{NameResolver, Resolution, ResolutionCache};
use crate::time::FactDate;

/// Entity snapshot, its name index and the engine configuration.
#[derive(Debug, Clone)]
pub struct WorldEngine {
    entities: EntitySet,
    index: NameIndex,
    merger: LayeredMerger,
    config: EngineConfig,
}

impl WorldEngine {
    /// Validates `config` and `entities` and builds the name index.
    ///
    /// # Errors
    ///
    /// Returns `ChronicleError::Config` for an invalid configuration and
    /// `ChronicleError::Index` for an empty or malformed entity set.
    pub fn new(entities: Vec<Entity>, config: EngineConfig) -> ChronicleResult<Self> {
        let config = config.validate()?;
        let entities = EntitySet::new(entities)?;
        let index = NameIndex::build(&entities);
        let merger = LayeredMerger::new(config.merge.layer_priority.clone());
        Ok(Self {
            entities,
            index,
            merger,
            config,
        })
    }

    /// Loads the entity snapshot from a registry.
    ///
    /// # Errors
    ///
    /// Propagates registry failures and everything [`WorldEngine::new`]
    /// rejects.
    pub fn from_registry(registry: &dyn EntityRegistry, config: EngineConfig) -> ChronicleResult<Self> {
        let entities = registry.load_entities()?;
        Self::new(entities, config)
    }

    /// The validated entity set.
    #[must_use]
    pub const fn entities(&self) -> &EntitySet {
        &self.entities
    }

    /// The name index built over the entity set.
    #[must_use]
    pub const fn index(&self) -> &NameIndex {
        &self.index
    }

    /// The configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Merger configured with the engine's layer priority.
    #[must_use]
    pub const fn merger(&self) -> &LayeredMerger {
        &self.merger
    }

    /// A resolver over the engine's index. Bring your own cache.
    #[must_use]
    pub fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(&self.index, &self.config.resolver)
    }

    /// Starts a query session with an empty resolution cache.
    #[must_use]
    pub fn session(&self) -> QuerySession<'_> {
        QuerySession {
            engine: self,
            cache: ResolutionCache::new(),
        }
    }
}

/// One request's view of a [`WorldEngine`].
#[derive(Debug)]
pub struct QuerySession<'e> {
    engine: &'e WorldEngine,
    cache: ResolutionCache,
}

impl<'e> QuerySession<'e> {
    /// The engine this session queries.
    #[must_use]
    pub const fn engine(&self) -> &'e WorldEngine {
        self.engine
    }

    /// Resolutions memoized so far in this session.
    #[must_use]
    pub const fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Resolves a mention through the session cache.
    pub fn resolve_name(&mut self, query: &str, filter: Option<EntityType>) -> Resolution {
        self.engine.resolver().resolve(query, filter, &mut self.cache)
    }

    /// The entity a mention resolves to, if it resolves to exactly one.
    pub fn resolve_entity(&mut self, query: &str, filter: Option<EntityType>) -> Option<&'e Entity> {
        let owner = self.resolve_name(query, filter).owner()?;
        self.engine.entities.get(owner)
    }

    /// Value of an entity property as of `as_of`, registry overrides stacked
    /// on `baseline`.
    #[must_use]
    pub fn entity_scalar(
        &self,
        entity: &Entity,
        key: &str,
        baseline: Option<&str>,
        as_of: Option<FactDate>,
    ) -> Option<Fact> {
        self.merge_scalar(baseline, &entity.property_layers(key), as_of)
    }

    /// See [`LayeredMerger::merge_scalar`].
    #[must_use]
    pub fn merge_scalar(
        &self,
        baseline: Option<&str>,
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Option<Fact> {
        self.engine.merger.merge_scalar(baseline, layers, as_of)
    }

    /// See [`LayeredMerger::merge_multi`].
    #[must_use]
    pub fn merge_multi(&self, baseline: &[String], layers: &PropertyLayers, as_of: Option<FactDate>) -> Vec<Fact> {
        self.engine.merger.merge_multi(baseline, layers, as_of)
    }

    /// See [`LayeredMerger::merge_quantity`].
    #[must_use]
    pub fn merge_quantity(
        &self,
        baseline: Option<&str>,
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Option<Quantity> {
        self.engine.merger.merge_quantity(baseline, layers, as_of)
    }

    /// See [`LayeredMerger::merge_reputation_tier`].
    #[must_use]
    pub fn merge_reputation_tier(
        &self,
        tier: &str,
        baseline: &[ReputationEntry],
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Vec<ReputationEntry> {
        self.engine
            .merger
            .merge_reputation_tier(tier, baseline, layers, as_of)
    }

    /// Location report using the engine's configured options.
    pub fn build_location_report(&mut self, occurrences: &[LocationOccurrence]) -> LocationReport {
        let options = self.engine.config.location.clone();
        self.build_location_report_with(occurrences, options, None)
    }

    /// Location report with explicit options and, for reference scanning,
    /// an optional source reader.
    pub fn build_location_report_with(
        &mut self,
        occurrences: &[LocationOccurrence],
        options: LocationReportOptions,
        reader: Option<&dyn SourceReader>,
    ) -> LocationReport {
        let mut reporter = LocationReporter::new(options).with_resolver(self.engine.resolver());
        if let Some(reader) = reader {
            reporter = reporter.with_source_reader(reader);
        }
        reporter.build(occurrences, &mut self.cache)
    }

    /// Audits intel entries, sharing this session's cache.
    pub fn audit_intel(&mut self, sessions: &[SessionRecord], as_of: Option<FactDate>) -> Vec<IntelFinding> {
        audit_intel(sessions, &self.engine.resolver(), &mut self.cache, as_of)
    }
}
