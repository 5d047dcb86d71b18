//! Name index over the entity registry.
//!
//! Three lookup structures are built in one pass over an [`EntitySet`]:
//!
//! - an exact map from normalized name or alias to its owners,
//! - a stem map for inflected variants ([`stem_key`]),
//! - a BK-tree over the exact keys for edit-distance queries.
//!
//! The index is immutable once built. A changed registry means a new index.

mod bktree;
mod distance;
mod stem;

pub use bktree::{BkMatch, BkTree};
pub use distance::{levenshtein, levenshtein_within};
pub use stem::stem_key;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntitySet, EntityType};
use crate::error::IndexError;

/// Trim, collapse inner whitespace and lower-case a name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One registered name pointing at its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Entity the name belongs to.
    pub owner: EntityId,
    /// Canonical name of the owner.
    pub owner_name: String,
    /// Type of the owner, used by type filters.
    pub owner_type: EntityType,
    /// The name or alias, as registered, that produced this entry.
    pub matched_name: String,
    /// Another owner registered the same key.
    pub ambiguous: bool,
}

impl IndexEntry {
    fn new(entity: &Entity, matched_name: &str) -> Self {
        Self {
            owner: entity.id,
            owner_name: entity.canonical_name.clone(),
            owner_type: entity.entity_type,
            matched_name: matched_name.trim().to_string(),
            ambiguous: false,
        }
    }
}

/// Exact, stem and edit-distance lookup over registered names.
#[derive(Debug, Clone)]
pub struct NameIndex {
    exact: HashMap<String, Vec<IndexEntry>>,
    stems: HashMap<String, Vec<IndexEntry>>,
    tree: BkTree<IndexEntry>,
    entity_count: usize,
}

impl NameIndex {
    /// Builds the index from a validated entity set.
    ///
    /// Keys are registered in entity order, canonical name before aliases.
    /// The first owner of a key stays first; any later, different owner is
    /// appended and every entry under that key is flagged ambiguous.
    #[must_use]
    pub fn build(entities: &EntitySet) -> Self {
        let mut exact: HashMap<String, Vec<IndexEntry>> = HashMap::new();
        let mut key_order: Vec<String> = Vec::new();

        for entity in entities.entities() {
            for name in entity.names() {
                let key = normalize_name(name);
                if key.is_empty() {
                    continue;
                }
                let slot = exact.entry(key.clone()).or_insert_with(|| {
                    key_order.push(key.clone());
                    Vec::new()
                });
                if slot.iter().any(|e| e.owner == entity.id) {
                    continue;
                }
                let mut entry = IndexEntry::new(entity, name);
                if !slot.is_empty() {
                    tracing::debug!(key = %key, owner = %entity.canonical_name, "name registered by more than one entity");
                    entry.ambiguous = true;
                    for earlier in slot.iter_mut() {
                        earlier.ambiguous = true;
                    }
                }
                slot.push(entry);
            }
        }

        let mut stems: HashMap<String, Vec<IndexEntry>> = HashMap::new();
        let mut tree = BkTree::new();
        for key in &key_order {
            let Some(entries) = exact.get(key) else {
                continue;
            };
            let bucket = stems.entry(stem_key(key)).or_default();
            for entry in entries {
                if !bucket.iter().any(|e| e.owner == entry.owner) {
                    bucket.push(entry.clone());
                }
                tree.insert(key, entry.clone());
            }
        }

        tracing::debug!(
            entities = entities.len(),
            keys = key_order.len(),
            stems = stems.len(),
            "built name index"
        );

        Self {
            exact,
            stems,
            tree,
            entity_count: entities.len(),
        }
    }

    /// Validates `entities` and builds the index.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] if the entity set is empty or malformed.
    pub fn from_entities(entities: Vec<Entity>) -> Result<Self, IndexError> {
        Ok(Self::build(&EntitySet::new(entities)?))
    }

    /// Entries registered under the exact (normalized) name.
    #[must_use]
    pub fn exact(&self, name: &str) -> &[IndexEntry] {
        self.exact
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first owner registered under `name`, if any.
    #[must_use]
    pub fn primary(&self, name: &str) -> Option<&IndexEntry> {
        self.exact(name).first()
    }

    /// Entries whose name shares the stem key of `name`.
    #[must_use]
    pub fn stem_candidates(&self, name: &str) -> &[IndexEntry] {
        self.stems
            .get(&stem_key(&normalize_name(name)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registered keys within `max_distance` edits of `name`.
    #[must_use]
    pub fn within_distance(&self, name: &str, max_distance: usize) -> Vec<BkMatch<'_, IndexEntry>> {
        self.tree.find(&normalize_name(name), max_distance)
    }

    /// Number of entities the index was built from.
    #[must_use]
    pub const fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Number of distinct exact keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.exact.len()
    }
}
