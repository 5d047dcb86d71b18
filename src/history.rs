//! Temporal history resolution.
//!
//! A [`History`] holds every fact recorded for one property of one entity.
//! The collection itself carries no meaning in its order except as the
//! final tiebreak: when two facts are equally recent, the later one in the
//! sequence wins, which is how a later override layer beats an earlier one.

use serde::{Deserialize, Serialize};

use crate::fact::Fact;
use crate::time::FactDate;

/// The facts recorded for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<Fact>);

impl History {
    /// An empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact; later facts win ties.
    pub fn push(&mut self, fact: Fact) {
        self.0.push(fact);
    }

    /// Facts in insertion order.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.0
    }

    /// Number of recorded facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no facts are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// See [`last_active`].
    #[must_use]
    pub fn last_active(&self, as_of: Option<FactDate>) -> Option<&Fact> {
        last_active(&self.0, as_of)
    }

    /// See [`all_active`].
    #[must_use]
    pub fn all_active(&self, as_of: Option<FactDate>) -> Vec<&Fact> {
        all_active(&self.0, as_of)
    }
}

impl From<Vec<Fact>> for History {
    fn from(facts: Vec<Fact>) -> Self {
        Self(facts)
    }
}

impl FromIterator<Fact> for History {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The single fact judged current at `as_of`.
///
/// Eligible facts are undated ones and those with `valid_from <= as_of`
/// (every fact is eligible when `as_of` is `None`). Among them the latest
/// `valid_from` wins, undated facts sorting lowest; ties go to the later
/// position. `valid_to` is not consulted.
///
/// # Examples
///
/// ```
/// use chronicle::{history::last_active, Fact};
///
/// let history = [Fact::parse("20 (2025-01:)"), Fact::parse("35 (2025-03:)")];
/// let feb = "2025-02".parse().ok();
/// assert_eq!(last_active(&history, feb).unwrap().value, "20");
/// ```
#[must_use]
pub fn last_active(history: &[Fact], as_of: Option<FactDate>) -> Option<&Fact> {
    let mut best: Option<&Fact> = None;
    for fact in history.iter().filter(|f| f.is_eligible(as_of)) {
        let replaces = match best {
            None => true,
            Some(current) => {
                let key = fact.valid_from.map(|d| d.date());
                let best_key = current.valid_from.map(|d| d.date());
                key >= best_key
            }
        };
        if replaces {
            best = Some(fact);
        }
    }
    best
}

/// Every fact whose window contains `as_of`, in input order.
///
/// A fact is included when it is eligible (as for [`last_active`]) and its
/// `valid_to` is unset or after `as_of`. Duplicate values are kept.
#[must_use]
pub fn all_active(history: &[Fact], as_of: Option<FactDate>) -> Vec<&Fact> {
    history.iter().filter(|f| f.is_active_at(as_of)).collect()
}
