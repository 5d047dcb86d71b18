//! Burkhard-Keller tree over edit distance.
//!
//! Each node stores one key; a child hangs off the edge labelled with its
//! distance to the parent. The triangle inequality lets a range query for
//! radius `r` skip every edge outside `[d - r, d + r]`.

use std::collections::BTreeMap;

use super::distance::levenshtein;

#[derive(Debug, Clone)]
struct Node<V> {
    key: String,
    values: Vec<V>,
    children: BTreeMap<usize, usize>,
}

/// A key within range of a query, with the values stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BkMatch<'a, V> {
    /// The stored key.
    pub key: &'a str,
    /// Levenshtein distance from the query.
    pub distance: usize,
    /// Everything inserted under `key`.
    pub values: &'a [V],
}

/// Metric tree keyed by Levenshtein distance.
#[derive(Debug, Clone)]
pub struct BkTree<V> {
    nodes: Vec<Node<V>>,
}

impl<V> Default for BkTree<V> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<V> BkTree<V> {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no key has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts `value` under `key`. Values for an existing key accumulate.
    pub fn insert(&mut self, key: &str, value: V) {
        if self.nodes.is_empty() {
            self.nodes.push(Node {
                key: key.to_string(),
                values: vec![value],
                children: BTreeMap::new(),
            });
            return;
        }

        let mut current = 0;
        loop {
            let distance = levenshtein(key, &self.nodes[current].key);
            if distance == 0 {
                self.nodes[current].values.push(value);
                return;
            }
            match self.nodes[current].children.get(&distance) {
                Some(&child) => current = child,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(Node {
                        key: key.to_string(),
                        values: vec![value],
                        children: BTreeMap::new(),
                    });
                    self.nodes[current].children.insert(distance, idx);
                    return;
                }
            }
        }
    }

    /// All keys within `max_distance` of `query`, sorted by distance then key.
    #[must_use]
    pub fn find(&self, query: &str, max_distance: usize) -> Vec<BkMatch<'_, V>> {
        let mut matches = Vec::new();
        if self.nodes.is_empty() {
            return matches;
        }

        let mut stack = vec![0];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            let distance = levenshtein(query, &node.key);
            if distance <= max_distance {
                matches.push(BkMatch {
                    key: node.key.as_str(),
                    distance,
                    values: node.values.as_slice(),
                });
            }
            let low = distance.saturating_sub(max_distance);
            let high = distance.saturating_add(max_distance);
            stack.extend(node.children.range(low..=high).map(|(_, &child)| child));
        }

        matches.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.key.cmp(b.key)));
        matches
    }
}
