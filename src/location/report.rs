//! Location report: grouping, linking and conflict detection.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::normalize::{is_decorated, segment_key, segments, split_route, strip_decoration, undecorated};
use super::references::{FsSourceReader, ReferenceScanner, SourceReader};
use crate::config::LocationReportOptions;
use crate::conflict::{ConflictKind, LinkConfidence, LinkKind, LocationConflict, LocationLink};
use crate::entity::EntityType;
use crate::index::levenshtein_within;
use crate::registry::{LocationOccurrence, Provenance};
use crate::resolve::{NameMatch, NameResolver, Resolution, ResolutionCache};

/// Where a row's mention was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Log file containing the mention.
    pub file_path: PathBuf,
    /// Date of the session, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_date: Option<NaiveDate>,
    /// Header of the session the mention came from.
    pub header: String,
    /// The route stop as written.
    pub text: String,
    /// 1-based line, when reference scanning found it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// How a row's name relates to the entity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCrossRef {
    /// Resolution restricted to locations.
    pub location: Resolution,
    /// A registered non-location the name resolves to instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_type: Option<NameMatch>,
}

/// One canonical location name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationReportRow {
    /// Display form: the most frequent spelling.
    pub canonical: String,
    /// Grouping key: lowercased and undecorated.
    pub key: String,
    /// How many mentions fell into this row.
    pub occurrences: usize,
    /// Other spellings seen, in first-seen order.
    pub variants: Vec<String>,
    /// Written as a `/` path.
    pub qualified: bool,
    /// Parent segments this name was written under.
    pub parents: Vec<String>,
    /// Segments written under this name.
    pub children: Vec<String>,
    /// Rows that probably denote the same place.
    pub links: Vec<LocationLink>,
    /// Registry cross-reference, when a resolver was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityCrossRef>,
    /// Every inconsistency found for this name.
    pub conflicts: Vec<LocationConflict>,
    /// Where each mention was written. Omitted when sources are disabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

impl LocationReportRow {
    /// True if any conflict of `kind` was found.
    #[must_use]
    pub fn has_conflict(&self, kind: ConflictKind) -> bool {
        self.conflicts.iter().any(|c| c.kind() == kind)
    }

    /// Registered location this row resolved to.
    #[must_use]
    pub fn location_match(&self) -> Option<&NameMatch> {
        self.entity.as_ref().and_then(|e| e.location.as_match())
    }
}

/// Rows sorted by descending occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationReport {
    /// Report rows, most frequent first.
    pub rows: Vec<LocationReportRow>,
}

impl LocationReport {
    /// Row whose display form is `canonical`.
    #[must_use]
    pub fn row(&self, canonical: &str) -> Option<&LocationReportRow> {
        self.rows.iter().find(|r| r.canonical == canonical)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no mention survived grouping and filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total conflicts across all rows.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.rows.iter().map(|r| r.conflicts.len()).sum()
    }

    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Spellings in first-seen order with their counts.
#[derive(Debug, Default)]
struct Tally {
    spellings: Vec<(String, usize)>,
}

impl Tally {
    fn add(&mut self, spelling: &str) {
        match self.spellings.iter_mut().find(|(s, _)| s == spelling) {
            Some((_, n)) => *n += 1,
            None => self.spellings.push((spelling.to_string(), 1)),
        }
    }

    /// Most frequent spelling; the first seen wins ties.
    fn display(&self) -> &str {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.spellings {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map_or("", |(s, _)| s.as_str())
    }

    fn variants(&self) -> Vec<String> {
        let display = self.display();
        self.spellings
            .iter()
            .filter(|(s, _)| s != display)
            .map(|(s, _)| s.clone())
            .collect()
    }
}

/// All mentions sharing one key.
#[derive(Debug)]
struct Group {
    key: String,
    segment_keys: Vec<String>,
    tally: Tally,
    count: usize,
    sources: Vec<(Provenance, String)>,
}

impl Group {
    fn new(key: String, segment_keys: Vec<String>) -> Self {
        Self {
            key,
            segment_keys,
            tally: Tally::default(),
            count: 0,
            sources: Vec::new(),
        }
    }

    fn is_qualified(&self) -> bool {
        self.segment_keys.len() > 1
    }

    fn leaf_key(&self) -> &str {
        self.segment_keys.last().map_or("", String::as_str)
    }

    fn parent_key(&self) -> Option<&str> {
        let n = self.segment_keys.len();
        (n > 1).then(|| self.segment_keys[n - 2].as_str())
    }
}

/// Parent/child edges between segment keys, with segment spellings.
#[derive(Debug, Default)]
struct Hierarchy {
    spellings: HashMap<String, Tally>,
    parents: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<String>>,
}

impl Hierarchy {
    fn record(&mut self, segments: &[String], keys: &[String]) {
        for (segment, key) in segments.iter().zip(keys) {
            self.spellings.entry(key.clone()).or_default().add(segment);
        }
        for pair in keys.windows(2) {
            let (parent, child) = (&pair[0], &pair[1]);
            if parent == child {
                continue;
            }
            push_unique(self.parents.entry(child.clone()).or_default(), parent);
            push_unique(self.children.entry(parent.clone()).or_default(), child);
        }
    }

    fn display(&self, key: &str) -> String {
        self.spellings
            .get(key)
            .map_or(key, |t| strip_decoration(t.display()))
            .to_string()
    }

    fn parents_of(&self, key: &str) -> Vec<String> {
        self.displays(self.parents.get(key))
    }

    fn children_of(&self, key: &str) -> Vec<String> {
        self.displays(self.children.get(key))
    }

    fn displays(&self, keys: Option<&Vec<String>>) -> Vec<String> {
        keys.map(|ks| ks.iter().map(|k| self.display(k)).collect())
            .unwrap_or_default()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Builds [`LocationReport`]s from raw occurrences.
///
/// Without a resolver the report skips the entity cross-reference, and the
/// fuzzy dedup cannot tell registered places apart.
pub struct LocationReporter<'a> {
    options: LocationReportOptions,
    resolver: Option<NameResolver<'a>>,
    reader: Option<&'a dyn SourceReader>,
}

impl<'a> LocationReporter<'a> {
    /// A reporter with no resolver and the filesystem as source reader.
    #[must_use]
    pub fn new(options: LocationReportOptions) -> Self {
        Self {
            options,
            resolver: None,
            reader: None,
        }
    }

    /// Cross-reference rows against registered entities.
    #[must_use]
    pub fn with_resolver(mut self, resolver: NameResolver<'a>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Reader used when `scan_references` is set. Defaults to the filesystem.
    #[must_use]
    pub fn with_source_reader(mut self, reader: &'a dyn SourceReader) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Options this reporter was built with.
    #[must_use]
    pub const fn options(&self) -> &LocationReportOptions {
        &self.options
    }

    /// Groups, links and checks every mention in `occurrences`.
    pub fn build(&self, occurrences: &[LocationOccurrence], cache: &mut ResolutionCache) -> LocationReport {
        let mut groups: Vec<Group> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut hierarchy = Hierarchy::default();

        for occurrence in occurrences {
            for stop in split_route(&occurrence.text) {
                let segs = segments(stop);
                if segs.is_empty() {
                    continue;
                }
                let keys: Vec<String> = segs.iter().map(|s| segment_key(s)).collect();
                hierarchy.record(&segs, &keys);

                let key = keys.join("/");
                let slot = *by_key.entry(key.clone()).or_insert_with(|| {
                    groups.push(Group::new(key, keys));
                    groups.len() - 1
                });
                let group = &mut groups[slot];
                group.count += 1;
                group.tally.add(&segs.join("/"));
                group.sources.push((occurrence.provenance.clone(), stop.to_string()));
            }
        }

        tracing::debug!(
            occurrences = occurrences.len(),
            rows = groups.len(),
            "grouped location mentions"
        );

        let mut rows: Vec<LocationReportRow> = groups.iter().map(|g| base_row(g, &hierarchy)).collect();
        link_qualified(&groups, &mut rows);
        self.link_near_duplicates(&groups, &mut rows);
        if let Some(resolver) = &self.resolver {
            for (group, row) in groups.iter().zip(rows.iter_mut()) {
                cross_reference(resolver, group, row, &hierarchy, cache);
            }
        }
        self.attach_sources(&groups, &mut rows);

        rows.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        rows.retain(|r| r.occurrences >= self.options.min_occurrences);
        LocationReport { rows }
    }

    fn link_near_duplicates(&self, groups: &[Group], rows: &mut [LocationReportRow]) {
        let max = self.options.max_fuzzy_distance;
        if max == 0 {
            return;
        }
        let standalone: Vec<usize> = (0..groups.len()).filter(|&i| !groups[i].is_qualified()).collect();

        for (pos, &a) in standalone.iter().enumerate() {
            for &b in &standalone[pos + 1..] {
                let Some(distance) = levenshtein_within(&groups[a].key, &groups[b].key, max) else {
                    continue;
                };
                if distance == 0 || self.registered_apart(&groups[a].key, &groups[b].key) {
                    continue;
                }
                let confidence = LinkConfidence::for_distance(distance);
                for (from, to) in [(a, b), (b, a)] {
                    let other = rows[to].canonical.clone();
                    rows[from].links.push(LocationLink {
                        target: other.clone(),
                        kind: LinkKind::LikelySame,
                        confidence,
                    });
                    rows[from].conflicts.push(LocationConflict::NearDuplicate {
                        other,
                        distance,
                        confidence,
                    });
                }
            }
        }
    }

    /// Both keys are registered names of different entities.
    fn registered_apart(&self, a: &str, b: &str) -> bool {
        let Some(resolver) = &self.resolver else {
            return false;
        };
        let index = resolver.index();
        match (index.primary(a), index.primary(b)) {
            (Some(x), Some(y)) => x.owner != y.owner,
            _ => false,
        }
    }

    fn attach_sources(&self, groups: &[Group], rows: &mut [LocationReportRow]) {
        if !self.options.include_sources && !self.options.scan_references {
            return;
        }
        let fs = FsSourceReader;
        let reader: &dyn SourceReader = match self.reader {
            Some(reader) => reader,
            None => &fs,
        };
        let mut scanner = self.options.scan_references.then(|| ReferenceScanner::new(reader));

        for (group, row) in groups.iter().zip(rows.iter_mut()) {
            row.sources = group
                .sources
                .iter()
                .map(|(provenance, text)| SourceRef {
                    file_path: provenance.file_path.clone(),
                    session_date: provenance.session_date,
                    header: provenance.header.clone(),
                    text: text.clone(),
                    line: scanner
                        .as_mut()
                        .and_then(|s| s.find_line(&provenance.file_path, &provenance.header, text)),
                })
                .collect();
        }

        if let Some(scanner) = &scanner {
            tracing::debug!(files = scanner.reads(), "scanned source references");
        }
    }
}

fn base_row(group: &Group, hierarchy: &Hierarchy) -> LocationReportRow {
    let canonical = group.tally.display().to_string();
    let variants = group.tally.variants();

    let mut conflicts = Vec::new();
    let respelled = group.tally.spellings.len() > 1;
    for (spelling, _) in &group.tally.spellings {
        if respelled && is_decorated(spelling) {
            conflicts.push(LocationConflict::TrailingArtifact {
                spelling: spelling.clone(),
            });
        }
    }
    let plain = undecorated(&canonical);
    for variant in &variants {
        if undecorated(variant) != plain {
            conflicts.push(LocationConflict::CaseVariant {
                spelling: variant.clone(),
            });
        }
    }

    // Any segment of the path, not only the leaf, may sit under two parents.
    let mut checked: Vec<&str> = Vec::with_capacity(group.segment_keys.len());
    for segment in &group.segment_keys {
        if checked.contains(&segment.as_str()) {
            continue;
        }
        checked.push(segment);
        let segment_parents = hierarchy.parents_of(segment);
        if segment_parents.len() > 1 {
            conflicts.push(LocationConflict::InconsistentHierarchy {
                segment: hierarchy.display(segment),
                parents: segment_parents,
            });
        }
    }

    let leaf = group.leaf_key();
    let leaf_parents = hierarchy.parents_of(leaf);

    let parents = match group.parent_key() {
        Some(parent) => vec![hierarchy.display(parent)],
        None => leaf_parents,
    };

    LocationReportRow {
        canonical,
        key: group.key.clone(),
        occurrences: group.count,
        variants,
        qualified: group.is_qualified(),
        parents,
        children: hierarchy.children_of(leaf),
        links: Vec::new(),
        entity: None,
        conflicts,
        sources: Vec::new(),
    }
}

fn link_qualified(groups: &[Group], rows: &mut [LocationReportRow]) {
    let mut by_leaf: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, group) in groups.iter().enumerate().filter(|(_, g)| g.is_qualified()) {
        by_leaf.entry(group.leaf_key()).or_default().push(i);
    }

    for (s, group) in groups.iter().enumerate().filter(|(_, g)| !g.is_qualified()) {
        let Some(qualified) = by_leaf.get(group.key.as_str()) else {
            continue;
        };
        let mut paths = Vec::with_capacity(qualified.len());
        for &q in qualified {
            let path = rows[q].canonical.clone();
            let standalone = rows[s].canonical.clone();
            rows[s].links.push(LocationLink {
                target: path.clone(),
                kind: LinkKind::QualifiedPath,
                confidence: LinkConfidence::High,
            });
            rows[q].links.push(LocationLink {
                target: standalone,
                kind: LinkKind::QualifiedPath,
                confidence: LinkConfidence::High,
            });
            paths.push(path);
        }
        rows[s].conflicts.push(LocationConflict::AmbiguousStandalone { qualified_paths: paths });
    }
}

fn cross_reference(
    resolver: &NameResolver<'_>,
    group: &Group,
    row: &mut LocationReportRow,
    hierarchy: &Hierarchy,
    cache: &mut ResolutionCache,
) {
    let mut names = vec![undecorated(&row.canonical)];
    if group.is_qualified() {
        names.push(hierarchy.display(group.leaf_key()));
    }

    let location = names
        .iter()
        .map(|n| resolver.resolve(n, Some(EntityType::Location), cache))
        .find(|r| !r.is_unresolved())
        .unwrap_or(Resolution::Unresolved);

    let mut other_type = None;
    if location.is_unresolved() {
        for name in &names {
            match resolver.resolve(name, None, cache) {
                Resolution::Unresolved => continue,
                Resolution::Match(m) if m.entry.owner_type != EntityType::Location => {
                    other_type = Some(m);
                    break;
                }
                _ => break,
            }
        }
    }

    if let Some(m) = &other_type {
        tracing::debug!(location = %row.canonical, entity = %m.entry.owner_name, "location name resolves to another entity type");
        row.conflicts.push(LocationConflict::TypeMismatch {
            entity: m.entry.owner_name.clone(),
            entity_type: m.entry.owner_type,
        });
    }
    row.entity = Some(EntityCrossRef { location, other_type });
}

/// Report without registry cross-references or custom source reader.
#[must_use]
pub fn build_location_report(occurrences: &[LocationOccurrence], options: &LocationReportOptions) -> LocationReport {
    LocationReporter::new(options.clone()).build(occurrences, &mut ResolutionCache::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::entity::Entity;
    use crate::index::NameIndex;

    fn occ(texts: &[&str]) -> Vec<LocationOccurrence> {
        let provenance = Provenance {
            file_path: PathBuf::from("sesje.md"),
            session_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            header: "## Sesja".to_string(),
        };
        texts
            .iter()
            .map(|t| LocationOccurrence::new(*t, provenance.clone()))
            .collect()
    }

    fn report(texts: &[&str]) -> LocationReport {
        build_location_report(&occ(texts), &LocationReportOptions::default())
    }

    #[test]
    fn test_groups_variants_under_most_frequent_spelling() {
        let r = report(&["targowisko*", "Targowisko", "Targowisko"]);
        assert_eq!(r.len(), 1);
        let row = &r.rows[0];
        assert_eq!(row.canonical, "Targowisko");
        assert_eq!(row.occurrences, 3);
        assert_eq!(row.variants, vec!["targowisko*"]);
        assert!(row.has_conflict(ConflictKind::TrailingArtifact));
        assert!(row.has_conflict(ConflictKind::CaseVariant));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let r = report(&["rynek", "Rynek"]);
        assert_eq!(r.rows[0].canonical, "rynek");
        assert_eq!(r.rows[0].variants, vec!["Rynek"]);
    }

    #[test]
    fn test_route_stops_are_separate_mentions() {
        let r = report(&["Brama -> Rynek - Zamek", "Rynek"]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.rows[0].canonical, "Rynek");
        assert_eq!(r.rows[0].occurrences, 2);
        assert_eq!(r.rows[1].canonical, "Brama");
    }

    #[test]
    fn test_qualified_path_links_and_hierarchy() {
        let r = report(&["Targowisko", "targowisko*", "Stolica/Targowisko"]);
        assert_eq!(r.len(), 2);

        let standalone = &r.rows[0];
        assert_eq!(standalone.canonical, "Targowisko");
        assert_eq!(standalone.occurrences, 2);
        assert!(standalone.conflicts.contains(&LocationConflict::AmbiguousStandalone {
            qualified_paths: vec!["Stolica/Targowisko".to_string()],
        }));
        assert_eq!(standalone.links[0].kind, LinkKind::QualifiedPath);
        assert_eq!(standalone.links[0].confidence, LinkConfidence::High);

        let qualified = &r.rows[1];
        assert!(qualified.qualified);
        assert_eq!(qualified.parents, vec!["Stolica"]);
        assert_eq!(qualified.links[0].target, "Targowisko");

        let stolica_children = report(&["Stolica/Targowisko", "Stolica"]);
        assert_eq!(stolica_children.row("Stolica").unwrap().children, vec!["Targowisko"]);
    }

    #[test]
    fn test_inconsistent_hierarchy() {
        let r = report(&["Stolica/Brama", "Zamek/Brama", "Brama"]);
        let brama = r.row("Brama").unwrap();
        match brama
            .conflicts
            .iter()
            .find(|c| c.kind() == ConflictKind::InconsistentHierarchy)
        {
            Some(LocationConflict::InconsistentHierarchy { segment, parents }) => {
                assert_eq!(segment, "Brama");
                assert_eq!(parents, &vec!["Stolica".to_string(), "Zamek".to_string()]);
            }
            other => panic!("expected hierarchy conflict, got {other:?}"),
        }
        assert!(r
            .row("Stolica/Brama")
            .unwrap()
            .has_conflict(ConflictKind::InconsistentHierarchy));
    }

    #[test]
    fn test_inconsistent_hierarchy_on_inner_segment() {
        let r = report(&["Stolica/Rynek/Karczma", "Zamek/Rynek/Studnia"]);
        for name in ["Stolica/Rynek/Karczma", "Zamek/Rynek/Studnia"] {
            let row = r.row(name).unwrap();
            assert_eq!(row.parents, vec!["Rynek"]);
            assert_eq!(
                row.conflicts,
                vec![LocationConflict::InconsistentHierarchy {
                    segment: "Rynek".to_string(),
                    parents: vec!["Stolica".to_string(), "Zamek".to_string()],
                }],
                "{name}"
            );
        }
    }

    #[test]
    fn test_single_decorated_spelling_is_not_an_artifact() {
        let r = report(&["Karczma*", "Karczma*"]);
        let row = &r.rows[0];
        assert_eq!(row.canonical, "Karczma*");
        assert!(row.variants.is_empty());
        assert!(row.conflicts.is_empty());
    }

    #[test]
    fn test_near_duplicates_are_bidirectional() {
        let r = report(&["Kowalsk", "Kowalski"]);
        for (name, other) in [("Kowalsk", "Kowalski"), ("Kowalski", "Kowalsk")] {
            let row = r.row(name).unwrap();
            assert_eq!(
                row.conflicts,
                vec![LocationConflict::NearDuplicate {
                    other: other.to_string(),
                    distance: 1,
                    confidence: LinkConfidence::Medium,
                }]
            );
            assert_eq!(row.links[0].kind, LinkKind::LikelySame);
        }
    }

    #[test]
    fn test_fuzzy_budget_respected() {
        let options = LocationReportOptions {
            max_fuzzy_distance: 0,
            ..LocationReportOptions::default()
        };
        let r = build_location_report(&occ(&["Kowalsk", "Kowalski"]), &options);
        assert_eq!(r.conflict_count(), 0);

        let r = report(&["Rynek", "Zamek"]);
        assert_eq!(r.conflict_count(), 0);
    }

    #[test]
    fn test_registered_pair_not_reported() {
        let index = NameIndex::from_entities(vec![
            Entity::new("Zamek", EntityType::Location),
            Entity::new("Zamet", EntityType::Location),
        ])
        .unwrap();
        let resolver = NameResolver::new(&index, &ResolverConfig::default());
        let reporter = LocationReporter::new(LocationReportOptions::default()).with_resolver(resolver);
        let r = reporter.build(&occ(&["Zamek", "Zamet"]), &mut ResolutionCache::new());
        assert!(!r.rows.iter().any(|row| row.has_conflict(ConflictKind::NearDuplicate)));
        assert!(r.row("Zamek").unwrap().location_match().is_some());
    }

    #[test]
    fn test_type_mismatch() {
        let index = NameIndex::from_entities(vec![
            Entity::new("Kruk", EntityType::Character),
            Entity::new("Stolica", EntityType::Location),
        ])
        .unwrap();
        let resolver = NameResolver::new(&index, &ResolverConfig::default());
        let reporter = LocationReporter::new(LocationReportOptions::default()).with_resolver(resolver);
        let r = reporter.build(&occ(&["Kruk", "Stolica/Brama"]), &mut ResolutionCache::new());

        let kruk = r.row("Kruk").unwrap();
        assert!(kruk.has_conflict(ConflictKind::TypeMismatch));
        assert_eq!(
            kruk.entity.as_ref().unwrap().other_type.as_ref().unwrap().entry.owner_type,
            EntityType::Character
        );

        let brama = r.row("Stolica/Brama").unwrap();
        assert!(brama.location_match().is_none());
        assert!(!brama.has_conflict(ConflictKind::TypeMismatch));
    }

    #[test]
    fn test_bracketed_names_resolve_exactly() {
        let index = NameIndex::from_entities(vec![
            Entity::new("Dom (Stary)", EntityType::Location),
            Entity::new("Karczma \"Pod Kogutem\"", EntityType::Location),
        ])
        .unwrap();
        let resolver = NameResolver::new(&index, &ResolverConfig::default());
        let reporter = LocationReporter::new(LocationReportOptions::default()).with_resolver(resolver);
        let r = reporter.build(
            &occ(&["Dom (Stary)", "Karczma \"Pod Kogutem\"*", "Karczma \"Pod Kogutem\""]),
            &mut ResolutionCache::new(),
        );

        let dom = r.row("Dom (Stary)").unwrap();
        assert_eq!(dom.key, "dom (stary)");
        assert_eq!(dom.location_match().unwrap().stage, crate::resolve::ResolutionStage::Exact);

        let karczma = &r.rows[0];
        assert_eq!(karczma.occurrences, 2);
        assert_eq!(karczma.location_match().unwrap().stage, crate::resolve::ResolutionStage::Exact);
    }

    #[test]
    fn test_min_occurrences_and_sources() {
        let options = LocationReportOptions {
            min_occurrences: 2,
            ..LocationReportOptions::default()
        };
        let r = build_location_report(&occ(&["Rynek", "Rynek", "Zamek"]), &options);
        assert_eq!(r.len(), 1);
        assert_eq!(r.rows[0].sources.len(), 2);
        assert_eq!(r.rows[0].sources[0].line, None);

        let bare = LocationReportOptions {
            include_sources: false,
            ..LocationReportOptions::default()
        };
        let r = build_location_report(&occ(&["Rynek"]), &bare);
        assert!(r.rows[0].sources.is_empty());
    }
}
