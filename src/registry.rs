//! Collaborator interfaces.
//!
//! The engine never reads the record store itself. The entity registry and
//! the session log are parsed elsewhere and handed over through these
//! traits as complete in-memory snapshots.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::ChronicleResult;

/// Supplies the parsed entity registry.
pub trait EntityRegistry {
    /// Loads every registered entity, in registry order.
    ///
    /// # Errors
    ///
    /// Implementations report load failures as
    /// [`crate::ChronicleError::Collaborator`].
    fn load_entities(&self) -> ChronicleResult<Vec<Entity>>;
}

/// Supplies parsed session records.
pub trait SessionLog {
    /// Loads every session, in log order.
    ///
    /// # Errors
    ///
    /// Implementations report load failures as
    /// [`crate::ChronicleError::Collaborator`].
    fn load_sessions(&self) -> ChronicleResult<Vec<SessionRecord>>;
}

/// Where a mention was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// File the mention was read from.
    pub file_path: PathBuf,
    /// Date of the session, if it had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_date: Option<NaiveDate>,
    /// Session header line.
    pub header: String,
}

/// One raw location mention with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOccurrence {
    /// The mention as written, possibly a route.
    pub text: String,
    /// Where it was written.
    pub provenance: Provenance,
}

impl LocationOccurrence {
    /// Pairs a mention with its provenance.
    #[must_use]
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }
}

/// A piece of information passed to characters during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelEntry {
    /// How the intel is delivered, as written in the log.
    pub directive: String,
    /// Who or what the intel is about.
    pub target: String,
    /// Names of those who learned it.
    pub recipients: Vec<String>,
    /// The intel itself.
    pub message: String,
}

/// A parsed session log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session date, if the header carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Who ran the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrator: Option<String>,
    /// Log file the session was read from.
    pub file_path: PathBuf,
    /// The session header line as written.
    pub header: String,
    /// Raw location mentions, routes included.
    #[serde(default)]
    pub locations: Vec<String>,
    /// Intel handed out during the session.
    #[serde(default)]
    pub intel: Vec<IntelEntry>,
}

impl SessionRecord {
    /// Provenance shared by everything recorded in this session.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        Provenance {
            file_path: self.file_path.clone(),
            session_date: self.date,
            header: self.header.clone(),
        }
    }

    /// The session's location mentions, each tagged with this session's
    /// provenance.
    #[must_use]
    pub fn occurrences(&self) -> Vec<LocationOccurrence> {
        let provenance = self.provenance();
        self.locations
            .iter()
            .map(|text| LocationOccurrence::new(text.clone(), provenance.clone()))
            .collect()
    }
}

/// All location mentions across `sessions`, in log order.
#[must_use]
pub fn occurrences_from_sessions(sessions: &[SessionRecord]) -> Vec<LocationOccurrence> {
    sessions.iter().flat_map(SessionRecord::occurrences).collect()
}

/// Registry backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entities: Vec<Entity>,
}

impl InMemoryRegistry {
    /// Wraps an already parsed registry.
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

impl EntityRegistry for InMemoryRegistry {
    fn load_entities(&self) -> ChronicleResult<Vec<Entity>> {
        Ok(self.entities.clone())
    }
}

/// Session log backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionLog {
    sessions: Vec<SessionRecord>,
}

impl InMemorySessionLog {
    /// Wraps already parsed sessions.
    #[must_use]
    pub fn new(sessions: Vec<SessionRecord>) -> Self {
        Self { sessions }
    }
}

impl SessionLog for InMemorySessionLog {
    fn load_sessions(&self) -> ChronicleResult<Vec<SessionRecord>> {
        Ok(self.sessions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;

    fn session(date: &str, locations: &[&str]) -> SessionRecord {
        SessionRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            narrator: Some("MG".to_string()),
            file_path: PathBuf::from("sesje/2025.md"),
            header: format!("## Sesja {date}"),
            locations: locations.iter().map(ToString::to_string).collect(),
            intel: Vec::new(),
        }
    }

    #[test]
    fn test_occurrences_carry_provenance() {
        let s = session("2025-02-01", &["Targowisko", "Stolica/Brama"]);
        let occ = s.occurrences();
        assert_eq!(occ.len(), 2);
        assert_eq!(occ[1].text, "Stolica/Brama");
        assert_eq!(occ[1].provenance.header, "## Sesja 2025-02-01");
        assert_eq!(occ[1].provenance.session_date, NaiveDate::from_ymd_opt(2025, 2, 1));
    }

    #[test]
    fn test_occurrences_from_sessions_in_order() {
        let sessions = vec![session("2025-01-01", &["A"]), session("2025-01-08", &["B", "C"])];
        let texts: Vec<String> = occurrences_from_sessions(&sessions)
            .into_iter()
            .map(|o| o.text)
            .collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_in_memory_collaborators() {
        let registry = InMemoryRegistry::new(vec![Entity::new("Stolica", EntityType::Location)]);
        assert_eq!(registry.load_entities().unwrap().len(), 1);
        let log = InMemorySessionLog::new(vec![session("2025-01-01", &[])]);
        assert_eq!(log.load_sessions().unwrap().len(), 1);
    }
}
