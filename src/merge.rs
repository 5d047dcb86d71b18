//! Layered property merging.
//!
//! An entity's authored file supplies the undated baseline. Override layers
//! (the registry's dated bullets, session-log corrections, ...) are stacked
//! on top in an explicit [`LayerPriority`] and the stacked history is
//! resolved with [`crate::history`]. Merging is a projection: neither the
//! baseline nor the layers are modified.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fact::Fact;
use crate::history::{all_active, last_active, History};
use crate::time::FactDate;

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)(?:\s|$|[^\d.,])").expect("static regex"));

/// Name of an override layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Id of the registry layer.
    pub const REGISTRY: &'static str = "registry";
    /// Id of the session log layer.
    pub const SESSION_LOG: &'static str = "session_log";

    /// Wraps an arbitrary layer name.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Overrides recorded in the entity registry itself.
    #[must_use]
    pub fn registry() -> Self {
        Self::new(Self::REGISTRY)
    }

    /// Overrides derived from session logs.
    #[must_use]
    pub fn session_log() -> Self {
        Self::new(Self::SESSION_LOG)
    }

    /// The layer name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order in which override layers are stacked, lowest precedence first.
///
/// - Empty lists are rejected.
/// - Duplicates are ignored (first occurrence wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LayerPriority(Vec<LayerId>);

impl LayerPriority {
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyLayerPriority` for an empty list.
    pub fn new(priority: Vec<LayerId>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(priority.len());
        let deduped: Vec<LayerId> = priority
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        if deduped.is_empty() {
            return Err(ValidationError::EmptyLayerPriority);
        }
        Ok(Self(deduped))
    }

    /// Layer ids, lowest precedence first.
    #[must_use]
    pub fn as_slice(&self) -> &[LayerId] {
        &self.0
    }

    /// True if `id` takes part in the merge.
    #[must_use]
    pub fn contains(&self, id: &LayerId) -> bool {
        self.0.contains(id)
    }
}

impl Default for LayerPriority {
    /// Registry first, session log on top.
    fn default() -> Self {
        Self(vec![LayerId::registry(), LayerId::session_log()])
    }
}

impl<'de> Deserialize<'de> for LayerPriority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<LayerId>::deserialize(deserializer)?;
        LayerPriority::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Raw override strings for one property, grouped by layer.
///
/// Strings still carry their validity annotation; they are parsed during
/// the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyLayers(BTreeMap<LayerId, Vec<String>>);

impl PropertyLayers {
    /// No layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`PropertyLayers::insert`].
    #[must_use]
    pub fn with_layer<I, S>(mut self, id: LayerId, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(id, facts);
        self
    }

    /// Appends facts to a layer, creating it if needed.
    pub fn insert<I, S>(&mut self, id: LayerId, facts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(id)
            .or_default()
            .extend(facts.into_iter().map(Into::into));
    }

    /// Raw strings recorded for a layer.
    #[must_use]
    pub fn get(&self, id: &LayerId) -> Option<&[String]> {
        self.0.get(id).map(Vec::as_slice)
    }

    /// Layer ids present, in key order.
    pub fn layer_ids(&self) -> impl Iterator<Item = &LayerId> {
        self.0.keys()
    }

    /// True if no layer holds any string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// A numeric property kept alongside the text it came from.
///
/// `parsed_value` is `None` when the text does not start with an integer;
/// the failure stays visible instead of collapsing to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// The value as written.
    pub raw_text: String,
    /// Its leading integer, if it has one.
    pub parsed_value: Option<i64>,
}

impl Quantity {
    /// # Examples
    ///
    /// ```
    /// use chronicle::Quantity;
    ///
    /// assert_eq!(Quantity::parse("120 zł").parsed_value, Some(120));
    /// assert_eq!(Quantity::parse("dużo").parsed_value, None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let parsed_value = LEADING_INT
            .captures(text)
            .and_then(|caps| caps[1].trim_start_matches('+').parse().ok());
        Self {
            raw_text: text.to_string(),
            parsed_value,
        }
    }
}

/// One entry of a reputation tier: a primary value (usually a group or a
/// person) and an optional free-text detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationEntry {
    /// Tier name, e.g. `friendly`.
    pub tier: String,
    /// Primary value, usually a group or a person.
    pub value: String,
    /// Text after the first `:`, `-` or `(`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReputationEntry {
    /// Creates an entry in `tier`.
    #[must_use]
    pub fn new(tier: impl Into<String>, value: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            tier: tier.into(),
            value: value.into(),
            detail,
        }
    }
}

/// Stacks baseline and override layers and resolves them as of a date.
#[derive(Debug, Clone, Default)]
pub struct LayeredMerger {
    priority: LayerPriority,
}

impl LayeredMerger {
    /// A merger stacking layers in `priority` order.
    #[must_use]
    pub const fn new(priority: LayerPriority) -> Self {
        Self { priority }
    }

    /// The layer order in use.
    #[must_use]
    pub const fn priority(&self) -> &LayerPriority {
        &self.priority
    }

    /// Builds the history for one property: non-blank baseline values as
    /// undated facts, then each prioritised layer's parsed overrides.
    ///
    /// Layers not named in the priority are skipped.
    #[must_use]
    pub fn history<'a, I>(&self, baseline: I, layers: &PropertyLayers) -> History
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut history: History = baseline
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(Fact::undated)
            .collect();

        for id in layers.layer_ids().filter(|id| !self.priority.contains(id)) {
            tracing::warn!(layer = %id, "override layer has no priority; ignoring it");
        }

        for id in self.priority.as_slice() {
            for raw in layers.get(id).unwrap_or_default() {
                history.push(Fact::parse(raw));
            }
        }
        history
    }

    /// Last-dated-wins value of a single-valued property.
    #[must_use]
    pub fn merge_scalar(
        &self,
        baseline: Option<&str>,
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Option<Fact> {
        let history = self.history(baseline, layers);
        last_active(history.facts(), as_of).cloned()
    }

    /// [`LayeredMerger::merge_scalar`] read as a quantity.
    #[must_use]
    pub fn merge_quantity(
        &self,
        baseline: Option<&str>,
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Option<Quantity> {
        self.merge_scalar(baseline, layers, as_of)
            .map(|fact| Quantity::parse(&fact.value))
    }

    /// Every value of a multi-valued property active at `as_of`, in stacking
    /// order. Values repeated across layers are not deduplicated.
    #[must_use]
    pub fn merge_multi(
        &self,
        baseline: &[String],
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Vec<Fact> {
        let history = self.history(baseline.iter().map(String::as_str), layers);
        all_active(history.facts(), as_of).into_iter().cloned().collect()
    }

    /// Active entries of one reputation tier.
    ///
    /// Only the primary values go through the merge. A merged value that
    /// also appears in the baseline tier (case-insensitive) keeps the
    /// baseline detail; values only an override introduced carry none.
    #[must_use]
    pub fn merge_reputation_tier(
        &self,
        tier: &str,
        baseline: &[ReputationEntry],
        layers: &PropertyLayers,
        as_of: Option<FactDate>,
    ) -> Vec<ReputationEntry> {
        let in_tier: Vec<&ReputationEntry> = baseline.iter().filter(|e| e.tier == tier).collect();

        let mut details: BTreeMap<String, &str> = BTreeMap::new();
        for entry in &in_tier {
            if let Some(detail) = entry.detail.as_deref() {
                details.entry(entry.value.trim().to_lowercase()).or_insert(detail);
            }
        }

        let history = self.history(in_tier.iter().map(|e| e.value.as_str()), layers);
        all_active(history.facts(), as_of)
            .into_iter()
            .map(|fact| {
                let detail = details
                    .get(&fact.value.to_lowercase())
                    .map(|d| (*d).to_string());
                ReputationEntry::new(tier, fact.value.clone(), detail)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Option<FactDate> {
        Some(s.parse().unwrap())
    }

    fn registry(facts: &[&str]) -> PropertyLayers {
        PropertyLayers::new().with_layer(LayerId::registry(), facts.iter().copied())
    }

    #[test]
    fn test_layer_priority_validation() {
        assert!(LayerPriority::new(vec![]).is_err());
        let p = LayerPriority::new(vec![
            LayerId::new("a"),
            LayerId::new("b"),
            LayerId::new("a"),
        ])
        .unwrap();
        assert_eq!(p.as_slice(), &[LayerId::new("a"), LayerId::new("b")]);
    }

    #[test]
    fn test_layer_priority_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<LayerPriority>("[]").is_err());
        let p: LayerPriority = serde_json::from_str(r#"["session_log","registry"]"#).unwrap();
        assert_eq!(p.as_slice()[0], LayerId::session_log());
    }

    #[test]
    fn test_scalar_dated_overrides() {
        let merger = LayeredMerger::default();
        let layers = registry(&["20 (2025-01:)", "35 (2025-03:)"]);
        assert_eq!(merger.merge_scalar(None, &layers, at("2025-02")).unwrap().value, "20");
        assert_eq!(merger.merge_scalar(None, &layers, at("2025-06")).unwrap().value, "35");
        assert!(merger.merge_scalar(None, &layers, at("2024-06")).is_none());
    }

    #[test]
    fn test_scalar_baseline_until_first_override() {
        let merger = LayeredMerger::default();
        let layers = registry(&["Stolica (2025-04:)"]);
        let before = merger.merge_scalar(Some("Targowisko"), &layers, at("2025-01")).unwrap();
        assert_eq!(before.value, "Targowisko");
        assert!(before.is_undated());
        let after = merger.merge_scalar(Some("Targowisko"), &layers, at("2025-05")).unwrap();
        assert_eq!(after.value, "Stolica");
    }

    #[test]
    fn test_blank_baseline_is_skipped() {
        let merger = LayeredMerger::default();
        assert!(merger.merge_scalar(Some("   "), &PropertyLayers::new(), None).is_none());
    }

    #[test]
    fn test_undated_override_beats_baseline_by_position() {
        let merger = LayeredMerger::default();
        let layers = registry(&["Kowal"]);
        assert_eq!(merger.merge_scalar(Some("Rolnik"), &layers, None).unwrap().value, "Kowal");
    }

    #[test]
    fn test_priority_decides_between_undated_layers() {
        let layers = PropertyLayers::new()
            .with_layer(LayerId::registry(), ["z rejestru"])
            .with_layer(LayerId::session_log(), ["z sesji"]);

        let default = LayeredMerger::default();
        assert_eq!(default.merge_scalar(None, &layers, None).unwrap().value, "z sesji");

        let reversed = LayeredMerger::new(
            LayerPriority::new(vec![LayerId::session_log(), LayerId::registry()]).unwrap(),
        );
        assert_eq!(reversed.merge_scalar(None, &layers, None).unwrap().value, "z rejestru");
    }

    #[test]
    fn test_unprioritised_layer_is_ignored() {
        let merger = LayeredMerger::new(LayerPriority::new(vec![LayerId::registry()]).unwrap());
        let layers = registry(&["10"]).with_layer(LayerId::new("scratch"), ["99"]);
        assert_eq!(merger.merge_scalar(None, &layers, None).unwrap().value, "10");
    }

    #[test]
    fn test_multi_keeps_duplicates_and_respects_windows() {
        let merger = LayeredMerger::default();
        let baseline = vec!["Miecz".to_string(), "Lina".to_string()];
        let layers = registry(&["Miecz (2025-02:)", "Latarnia (2025-01:2025-03)"]);
        let values: Vec<String> = merger
            .merge_multi(&baseline, &layers, at("2025-02"))
            .into_iter()
            .map(|f| f.value)
            .collect();
        assert_eq!(values, vec!["Miecz", "Lina", "Miecz", "Latarnia"]);

        let later = merger.merge_multi(&baseline, &layers, at("2025-03"));
        assert!(later.iter().all(|f| f.value != "Latarnia"));
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let merger = LayeredMerger::default();
        let baseline = vec!["a".to_string()];
        let layers = registry(&["b (2025-01:)"]);
        let snapshot = layers.clone();
        let _ = merger.merge_multi(&baseline, &layers, None);
        assert_eq!(layers, snapshot);
        assert_eq!(baseline, vec!["a".to_string()]);
    }

    #[test]
    fn test_quantity() {
        let merger = LayeredMerger::default();
        let layers = registry(&["120 zł (2025-01:)", "brak (2025-04:)"]);
        let jan = merger.merge_quantity(Some("40"), &layers, at("2025-01")).unwrap();
        assert_eq!(jan.parsed_value, Some(120));
        assert_eq!(jan.raw_text, "120 zł");
        let apr = merger.merge_quantity(Some("40"), &layers, at("2025-04")).unwrap();
        assert_eq!(apr.parsed_value, None);
        assert_eq!(apr.raw_text, "brak");
    }

    #[test]
    fn test_quantity_parse_edge_cases() {
        assert_eq!(Quantity::parse("-15").parsed_value, Some(-15));
        assert_eq!(Quantity::parse("+7 sztuk").parsed_value, Some(7));
        assert_eq!(Quantity::parse("12.5").parsed_value, None);
        assert_eq!(Quantity::parse("").parsed_value, None);
    }

    #[test]
    fn test_reputation_detail_preserved_on_match() {
        let merger = LayeredMerger::default();
        let baseline = vec![
            ReputationEntry::new("positive", "Gildia Kupców", Some("uratowali karawanę".to_string())),
            ReputationEntry::new("negative", "Straż Miejska", Some("bójka w karczmie".to_string())),
        ];
        let layers = registry(&["gildia kupców (2025-02:)", "Zakon Świtu (2025-02:)"]);

        let merged = merger.merge_reputation_tier("positive", &baseline, &layers, at("2025-03"));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].detail.as_deref(), Some("uratowali karawanę"));
        assert_eq!(merged[1].value, "gildia kupców");
        assert_eq!(merged[1].detail.as_deref(), Some("uratowali karawanę"));
        assert_eq!(merged[2].value, "Zakon Świtu");
        assert!(merged[2].detail.is_none());
        assert!(merged.iter().all(|e| e.tier == "positive"));
    }

    #[test]
    fn test_reputation_other_tiers_excluded() {
        let merger = LayeredMerger::default();
        let baseline = vec![ReputationEntry::new("negative", "Straż Miejska", None)];
        let merged = merger.merge_reputation_tier("positive", &baseline, &PropertyLayers::new(), None);
        assert!(merged.is_empty());
    }
}
