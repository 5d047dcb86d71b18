//! Audit of intel notifications recorded in session logs.
//!
//! Every intel entry names a target and the characters who learned it. The
//! audit resolves those names and reports the ones that do not point at a
//! single suitable entity.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::registry::SessionRecord;
use crate::resolve::{NameResolver, Resolution, ResolutionCache};
use crate::time::FactDate;

/// Which field of an intel entry a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelRole {
    /// The entry's target.
    Target,
    /// One of the entry's recipients.
    Recipient,
}

/// What is wrong with a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntelIssue {
    /// No registered entity matches.
    Unresolved,
    /// Several owners match at the deciding stage.
    Ambiguous {
        /// Canonical names of the tied owners.
        candidates: Vec<String>,
    },
    /// Intel delivered to something that cannot receive it.
    NonActorRecipient {
        /// Canonical name of the entity.
        entity: String,
        /// Its registered type.
        entity_type: EntityType,
    },
}

/// A name in an intel entry that needs the author's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelFinding {
    /// Session log file holding the entry.
    pub file_path: PathBuf,
    /// Header of the session the entry belongs to.
    pub header: String,
    /// Date of that session, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_date: Option<NaiveDate>,
    /// Delivery directive as written.
    pub directive: String,
    /// Whether the name was the target or a recipient.
    pub role: IntelRole,
    /// The name as written.
    pub name: String,
    /// What is wrong with it.
    pub issue: IntelIssue,
}

impl fmt::Display for IntelFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.role {
            IntelRole::Target => "target",
            IntelRole::Recipient => "recipient",
        };
        write!(f, "{} [{}] {role} '{}': ", self.file_path.display(), self.header, self.name)?;
        match &self.issue {
            IntelIssue::Unresolved => write!(f, "unresolved"),
            IntelIssue::Ambiguous { candidates } => write!(f, "ambiguous ({})", candidates.join(", ")),
            IntelIssue::NonActorRecipient { entity, entity_type } => {
                write!(f, "{entity} is a {entity_type} and cannot receive intel")
            }
        }
    }
}

/// Checks intel entries of every session dated on or before `as_of`.
/// Undated sessions are always checked.
pub fn audit_intel(
    sessions: &[SessionRecord],
    resolver: &NameResolver<'_>,
    cache: &mut ResolutionCache,
    as_of: Option<FactDate>,
) -> Vec<IntelFinding> {
    let cutoff = as_of.map(|d| d.date());
    let mut findings = Vec::new();

    for session in sessions {
        if let (Some(date), Some(cutoff)) = (session.date, cutoff) {
            if date > cutoff {
                continue;
            }
        }
        for entry in &session.intel {
            let mut report = |role: IntelRole, name: &str, issue: IntelIssue| {
                findings.push(IntelFinding {
                    file_path: session.file_path.clone(),
                    header: session.header.clone(),
                    session_date: session.date,
                    directive: entry.directive.clone(),
                    role,
                    name: name.to_string(),
                    issue,
                });
            };

            if !entry.target.trim().is_empty() {
                if let Some(issue) = unresolved_issue(&resolver.resolve(&entry.target, None, cache)) {
                    report(IntelRole::Target, &entry.target, issue);
                }
            }

            for recipient in entry.recipients.iter().filter(|r| !r.trim().is_empty()) {
                let resolution = resolver.resolve(recipient, None, cache);
                if let Some(issue) = unresolved_issue(&resolution) {
                    report(IntelRole::Recipient, recipient, issue);
                } else if let Some(m) = resolution.as_match() {
                    if !m.entry.owner_type.is_actor() {
                        report(
                            IntelRole::Recipient,
                            recipient,
                            IntelIssue::NonActorRecipient {
                                entity: m.entry.owner_name.clone(),
                                entity_type: m.entry.owner_type,
                            },
                        );
                    }
                }
            }
        }
    }

    tracing::debug!(sessions = sessions.len(), findings = findings.len(), "audited intel");
    findings
}

fn unresolved_issue(resolution: &Resolution) -> Option<IntelIssue> {
    match resolution {
        Resolution::Match(_) => None,
        Resolution::Ambiguous { candidates, .. } => Some(IntelIssue::Ambiguous {
            candidates: candidates.iter().map(|c| c.owner_name.clone()).collect(),
        }),
        Resolution::Unresolved => Some(IntelIssue::Unresolved),
    }
}
