//! Entity types and identity.
//!
//! Entities arrive from the registry collaborator already parsed: a
//! canonical name, aliases, a type, and the raw override strings recorded
//! per property. Identity is derived from `(type, canonical name)` so that
//! the same registry always yields the same ids.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IndexError, ValidationError};
use crate::merge::{LayerId, PropertyLayers};

const ENTITY_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_4f0e_93a4_5b7d_a2e1_0c8d_3b9f_7e21);

/// Stable entity identifier.
///
/// # Examples
///
/// ```
/// use chronicle::{EntityId, EntityType};
///
/// let a = EntityId::derive(EntityType::Location, "Targowisko");
/// let b = EntityId::derive(EntityType::Location, "Targowisko");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Derives the id of the entity registered as `name` with `entity_type`.
    #[must_use]
    pub fn derive(entity_type: EntityType, name: &str) -> Self {
        let key = format!("{entity_type}:{}", name.trim());
        Self(Uuid::new_v5(&ENTITY_NAMESPACE, key.as_bytes()))
    }

    /// The underlying v5 UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityType {
    /// A non-player character
    Character,
    /// A player character
    Player,
    /// An item or a currency holding
    Item,
    /// A place
    Location,
    /// A faction, guild or party
    Group,
    /// A door or passage
    Door,
}

impl EntityType {
    /// Every type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Character,
        Self::Player,
        Self::Item,
        Self::Location,
        Self::Group,
        Self::Door,
    ];

    /// Types that can send or receive intel.
    #[must_use]
    pub const fn is_actor(self) -> bool {
        matches!(self, Self::Character | Self::Player | Self::Group)
    }

    /// Lowercase name used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Player => "player",
            Self::Item => "item",
            Self::Location => "location",
            Self::Group => "group",
            Self::Door => "door",
        }
    }
}

impl TryFrom<String> for EntityType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let key = value.trim().to_ascii_lowercase();
        Ok(match key.as_str() {
            "character" | "npc" => Self::Character,
            "player" | "pc" => Self::Player,
            "item" | "currency" => Self::Item,
            "location" => Self::Location,
            "group" | "faction" => Self::Group,
            "door" => Self::Door,
            _ => return Err(ValidationError::UnknownEntityType { value }),
        })
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered campaign entity.
///
/// # Examples
///
/// ```
/// use chronicle::{Entity, EntityType};
///
/// let entity = Entity::new("Marek Kowalski", EntityType::Character)
///     .with_alias("Marek")
///     .with_override("location", ["Targowisko (2025-01:)"]);
/// assert_eq!(entity.names().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Derived from type and canonical name; see [`EntityId::derive`].
    pub id: EntityId,

    /// The name the registry files the entity under.
    pub canonical_name: String,

    /// Alternative names, resolved like the canonical one.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// What kind of thing the entity is.
    pub entity_type: EntityType,

    /// Raw override strings per property key, validity annotations intact.
    #[serde(default)]
    pub overrides: BTreeMap<String, Vec<String>>,
}

impl Entity {
    /// Creates an entity with no aliases or overrides.
    #[must_use]
    pub fn new(name: impl Into<String>, entity_type: EntityType) -> Self {
        let canonical_name = name.into();
        Self {
            id: EntityId::derive(entity_type, &canonical_name),
            canonical_name,
            aliases: Vec::new(),
            entity_type,
            overrides: BTreeMap::new(),
        }
    }

    /// Adds an alias; exact duplicates are ignored.
    pub fn add_alias(&mut self, alias: impl Into<String>) {
        let alias = alias.into();
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
    }

    /// Builder-style [`Entity::add_alias`].
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.add_alias(alias);
        self
    }

    /// Appends raw override strings under a property key.
    #[must_use]
    pub fn with_override<I, S>(mut self, key: impl Into<String>, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides
            .entry(key.into())
            .or_default()
            .extend(facts.into_iter().map(Into::into));
        self
    }

    /// Canonical name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// The registry's overrides for `key` as a single [`LayerId::registry`]
    /// layer. Empty when the property has no overrides.
    #[must_use]
    pub fn property_layers(&self, key: &str) -> PropertyLayers {
        match self.overrides.get(key) {
            Some(facts) => PropertyLayers::new().with_layer(LayerId::registry(), facts.iter().cloned()),
            None => PropertyLayers::new(),
        }
    }
}

/// A validated snapshot of the registry.
///
/// Guarantees a non-empty set, non-blank canonical names and unique
/// `(canonical name, type)` pairs. The same name under two types is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    entities: Vec<Entity>,
}

impl EntitySet {
    /// # Errors
    ///
    /// Returns an [`IndexError`] when the set is empty, a canonical name is
    /// blank, or a `(name, type)` pair repeats.
    pub fn new(entities: Vec<Entity>) -> Result<Self, IndexError> {
        if entities.is_empty() {
            return Err(IndexError::EmptyEntitySet);
        }

        let mut seen = HashSet::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            let name = entity.canonical_name.trim();
            if name.is_empty() {
                return Err(IndexError::BlankCanonicalName { position });
            }
            if !seen.insert((name.to_lowercase(), entity.entity_type)) {
                return Err(IndexError::DuplicateEntity {
                    name: name.to_string(),
                    entity_type: entity.entity_type,
                });
            }
        }

        Ok(Self { entities })
    }

    /// Entities in registry order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the set holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Entities of one type, in registry order.
    pub fn of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.entity_type == entity_type)
    }
}
