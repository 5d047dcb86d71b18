//! Staged name resolution against a [`NameIndex`].
//!
//! A free-text mention is tried against the exact map, then the stem map,
//! then the BK-tree. The first stage that yields any candidate decides the
//! outcome: one distinct owner is a match, several are ambiguous. Nothing
//! is ever guessed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::entity::{EntityId, EntityType};
use crate::index::{normalize_name, IndexEntry, NameIndex};

/// Which lookup produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    /// Normalized name equals a registered key.
    Exact,
    /// Shares a stem with a registered key.
    Stem,
    /// Within the edit distance budget.
    Fuzzy,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Stem => write!(f, "stem"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// A single resolved owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMatch {
    /// The index entry that matched.
    pub entry: IndexEntry,
    /// Stage that produced it.
    pub stage: ResolutionStage,
    /// Edit distance for fuzzy matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

/// Outcome of resolving one mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Exactly one owner.
    Match(NameMatch),
    /// Several owners at the deciding stage; none is picked.
    Ambiguous {
        /// Stage at which the tie occurred.
        stage: ResolutionStage,
        /// One entry per tied owner.
        candidates: Vec<IndexEntry>,
    },
    /// No stage produced a candidate.
    Unresolved,
}

impl Resolution {
    /// The match, if the outcome is one.
    #[must_use]
    pub const fn as_match(&self) -> Option<&NameMatch> {
        match self {
            Self::Match(m) => Some(m),
            _ => None,
        }
    }

    /// True for a single owner.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    /// True when several owners tied.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }

    /// True when nothing matched.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// The stage that decided the outcome, if any did.
    #[must_use]
    pub const fn stage(&self) -> Option<ResolutionStage> {
        match self {
            Self::Match(m) => Some(m.stage),
            Self::Ambiguous { stage, .. } => Some(*stage),
            Self::Unresolved => None,
        }
    }

    /// Owner of a match.
    #[must_use]
    pub fn owner(&self) -> Option<EntityId> {
        self.as_match().map(|m| m.entry.owner)
    }
}

/// Per-session memo of resolutions keyed by normalized query and filter.
///
/// Scope one cache to one query session; it is only valid for the index
/// it was filled from.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: HashMap<(String, Option<EntityType>), Resolution>,
    hits: usize,
}

impl ResolutionCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized resolutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }
}

/// Resolves mentions against a borrowed index.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    index: &'a NameIndex,
    max_edit_distance: usize,
}

impl<'a> NameResolver<'a> {
    /// Takes the fuzzy budget from `config`.
    #[must_use]
    pub fn new(index: &'a NameIndex, config: &ResolverConfig) -> Self {
        Self {
            index,
            max_edit_distance: config.max_edit_distance,
        }
    }

    /// The index being searched.
    #[must_use]
    pub const fn index(&self) -> &'a NameIndex {
        self.index
    }

    /// Resolves `query`, optionally restricted to one entity type.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronicle::{Entity, EntityType, NameIndex, NameResolver, ResolutionCache, ResolutionStage};
    /// use chronicle::config::ResolverConfig;
    ///
    /// let index = NameIndex::from_entities(vec![Entity::new("Targowisko", EntityType::Location)]).unwrap();
    /// let resolver = NameResolver::new(&index, &ResolverConfig::default());
    /// let mut cache = ResolutionCache::new();
    ///
    /// let found = resolver.resolve("Targowsko", Some(EntityType::Location), &mut cache);
    /// assert_eq!(found.stage(), Some(ResolutionStage::Fuzzy));
    /// ```
    pub fn resolve(
        &self,
        query: &str,
        filter: Option<EntityType>,
        cache: &mut ResolutionCache,
    ) -> Resolution {
        let key = normalize_name(query);
        if key.is_empty() {
            return Resolution::Unresolved;
        }

        let cache_key = (key, filter);
        if let Some(cached) = cache.entries.get(&cache_key) {
            cache.hits += 1;
            return cached.clone();
        }

        let resolution = self.resolve_uncached(&cache_key.0, filter);
        tracing::debug!(
            query = %cache_key.0,
            filter = ?filter,
            stage = ?resolution.stage(),
            matched = resolution.is_match(),
            "resolved name"
        );
        cache.entries.insert(cache_key, resolution.clone());
        resolution
    }

    fn resolve_uncached(&self, key: &str, filter: Option<EntityType>) -> Resolution {
        let exact = distinct_owners(self.index.exact(key).iter(), filter);
        if let Some(resolution) = decide(exact, ResolutionStage::Exact, None) {
            return resolution;
        }

        let stemmed = distinct_owners(self.index.stem_candidates(key).iter(), filter);
        if let Some(resolution) = decide(stemmed, ResolutionStage::Stem, None) {
            return resolution;
        }

        let mut fuzzy: Vec<(usize, IndexEntry)> = Vec::new();
        for found in self.index.within_distance(key, self.max_edit_distance) {
            for entry in found.values {
                if passes(entry, filter) && !fuzzy.iter().any(|(_, e)| e.owner == entry.owner) {
                    fuzzy.push((found.distance, entry.clone()));
                }
            }
        }
        let distance = fuzzy.first().map(|(d, _)| *d);
        let candidates = fuzzy.into_iter().map(|(_, e)| e).collect();
        decide(candidates, ResolutionStage::Fuzzy, distance).unwrap_or(Resolution::Unresolved)
    }
}

fn passes(entry: &IndexEntry, filter: Option<EntityType>) -> bool {
    filter.map_or(true, |t| entry.owner_type == t)
}

fn distinct_owners<'e>(
    entries: impl Iterator<Item = &'e IndexEntry>,
    filter: Option<EntityType>,
) -> Vec<IndexEntry> {
    let mut out: Vec<IndexEntry> = Vec::new();
    for entry in entries.filter(|e| passes(e, filter)) {
        if !out.iter().any(|e| e.owner == entry.owner) {
            out.push(entry.clone());
        }
    }
    out
}

fn decide(
    mut candidates: Vec<IndexEntry>,
    stage: ResolutionStage,
    distance: Option<usize>,
) -> Option<Resolution> {
    match candidates.len() {
        0 => None,
        1 => candidates.pop().map(|entry| {
            Resolution::Match(NameMatch {
                entry,
                stage,
                distance,
            })
        }),
        _ => Some(Resolution::Ambiguous { stage, candidates }),
    }
}
