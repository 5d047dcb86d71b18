//! Facts and the validity annotation grammar.
//!
//! Record authors date a fact by appending a parenthesised token:
//!
//! ```text
//! Marek Kowalski (2025-01:)          open range starting January 2025
//! 20 (2025-01:2025-03)               closed range, January up to March
//! Ranny (2025-02-14)                 bare date, open range from that day
//! ```
//!
//! Annotations are optional. Anything that does not match the grammar stays
//! part of the fact's text and the fact is undated.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::FactDate;

static ANNOTATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<text>.*?)\s*\((?P<token>[^()]*)\)\s*$").expect("static regex")
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<from>\d{4}-\d{2}(?:-\d{2})?)\s*(?:(?P<sep>:)\s*(?P<to>\d{4}-\d{2}(?:-\d{2})?)?\s*)?$",
    )
    .expect("static regex")
});

/// A value with an optional effective date range `[valid_from, valid_to)`.
///
/// `valid_from == None` marks an undated baseline fact, which is always
/// active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// The fact text with its annotation removed.
    pub value: String,

    /// First date the fact holds. `None` for baseline facts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<FactDate>,

    /// Exclusive end of the range, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<FactDate>,
}

impl Fact {
    /// Creates an undated fact.
    #[must_use]
    pub fn undated(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            valid_from: None,
            valid_to: None,
        }
    }

    /// Creates a fact active from `from` onwards.
    #[must_use]
    pub fn starting(value: impl Into<String>, from: FactDate) -> Self {
        Self {
            value: value.into(),
            valid_from: Some(from),
            valid_to: None,
        }
    }

    /// Creates a fact active in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRange` if `from` is after `to`.
    pub fn ranged(value: impl Into<String>, from: FactDate, to: FactDate) -> Result<Self, ValidationError> {
        if from.date() > to.date() {
            return Err(ValidationError::InvalidRange { from, to });
        }
        Ok(Self {
            value: value.into(),
            valid_from: Some(from),
            valid_to: Some(to),
        })
    }

    /// Parses a raw fact string. Never fails; see the module docs.
    ///
    /// # Examples
    ///
    /// ```
    /// use chronicle::Fact;
    ///
    /// let fact = Fact::parse("35 (2025-03:)");
    /// assert_eq!(fact.value, "35");
    /// assert_eq!(fact.valid_from.unwrap().to_string(), "2025-03");
    ///
    /// let plain = Fact::parse("Sword (rusty)");
    /// assert_eq!(plain.value, "Sword (rusty)");
    /// assert!(plain.is_undated());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        parse_annotated(raw).unwrap_or_else(|| {
            tracing::trace!(raw, "no validity annotation; treating fact as undated");
            Self::undated(raw.trim())
        })
    }

    /// True for baseline facts.
    #[must_use]
    pub const fn is_undated(&self) -> bool {
        self.valid_from.is_none()
    }

    /// `valid_from` is unset or not after `as_of`. Every fact is eligible
    /// when `as_of` is `None`.
    #[must_use]
    pub fn is_eligible(&self, as_of: Option<FactDate>) -> bool {
        match (self.valid_from, as_of) {
            (None, _) | (_, None) => true,
            (Some(from), Some(at)) => from.date() <= at.date(),
        }
    }

    /// Eligible, and not yet expired at `as_of`.
    #[must_use]
    pub fn is_active_at(&self, as_of: Option<FactDate>) -> bool {
        if !self.is_eligible(as_of) {
            return false;
        }
        match (self.valid_to, as_of) {
            (Some(to), Some(at)) => to.date() > at.date(),
            _ => true,
        }
    }
}

fn parse_annotated(raw: &str) -> Option<Fact> {
    let caps = ANNOTATED.captures(raw)?;
    let token = TOKEN.captures(&caps["token"])?;
    let text = caps["text"].trim().to_string();

    let from = FactDate::parse_opt(&token["from"])?;
    let to = match token.name("to") {
        Some(to) => Some(FactDate::parse_opt(to.as_str())?),
        None => None,
    };

    match to {
        Some(to) => Fact::ranged(text, from, to).ok(),
        None => Some(Fact::starting(text, from)),
    }
}

impl fmt::Display for Fact {
    /// Writes the fact back in annotation grammar. Undated facts print as
    /// bare text; dated facts always use the range form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.valid_from, self.valid_to) {
            (Some(from), Some(to)) => write!(f, "{} ({from}:{to})", self.value),
            (Some(from), None) => write!(f, "{} ({from}:)", self.value),
            (None, _) => write!(f, "{}", self.value),
        }
    }
}
