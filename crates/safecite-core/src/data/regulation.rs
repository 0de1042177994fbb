//! Regulation records and the ordered, read-only regulation table.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DataError;

/// Verdict vocabulary, derived from a record's free-form `decision` text.
///
/// Matching is by substring so externally supplied data with extra wording
/// ("NOT COMPLIANT - unless ...") still classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Compliant,
    NotCompliant,
    Prohibited,
    /// Anything outside the known vocabulary ("CONDITIONAL", "DEPENDS", ...).
    Other,
}

impl Verdict {
    /// Classify a decision string. "NOT COMPLIANT" is checked before
    /// "COMPLIANT" because the latter is a substring of the former.
    pub fn from_decision(decision: &str) -> Self {
        if decision.contains("NOT COMPLIANT") {
            Verdict::NotCompliant
        } else if decision.contains("PROHIBITED") {
            Verdict::Prohibited
        } else if decision.contains("COMPLIANT") {
            Verdict::Compliant
        } else {
            Verdict::Other
        }
    }

    /// Whether the verdict calls for corrective action.
    pub fn requires_corrective_action(self) -> bool {
        matches!(self, Verdict::NotCompliant | Verdict::Prohibited)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Compliant => write!(f, "compliant"),
            Verdict::NotCompliant => write!(f, "not_compliant"),
            Verdict::Prohibited => write!(f, "prohibited"),
            Verdict::Other => write!(f, "other"),
        }
    }
}

/// One entry in the structured compliance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// Unique within the table; used for citation lookup.
    pub id: String,
    /// Regulation section number (e.g. "1910.147").
    pub citation: String,
    /// Verdict text as written in the data file.
    pub decision: String,
    /// Short visual marker shown before the decision.
    #[serde(default)]
    pub icon: String,
    /// Human-readable explanation.
    pub summary: String,
    /// Violation cost exposure, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_range: Option<String>,
    /// Any one of these (case-insensitive substring) selects this record.
    #[serde(default)]
    pub question_patterns: Vec<String>,
}

impl Regulation {
    /// Closed verdict for this record's decision text.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_decision(&self.decision)
    }
}

/// On-disk shapes accepted for the regulation file.
#[derive(Deserialize)]
#[serde(untagged)]
enum TableDocument {
    Bare(Vec<Regulation>),
    Wrapped { regulations: Vec<Regulation> },
}

/// Ordered, immutable collection of regulation records.
///
/// Table order is significant: lookups are first-match-wins.
#[derive(Debug, Clone, Default)]
pub struct RegulationTable {
    records: Vec<Regulation>,
}

impl RegulationTable {
    /// An empty table; every lookup reports no match.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, rejecting empty or duplicate ids.
    pub fn new(records: Vec<Regulation>) -> Result<Self, DataError> {
        let mut seen = HashSet::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(DataError::EmptyId { index });
            }
            if !seen.insert(record.id.as_str()) {
                return Err(DataError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Parse a JSON document: either a bare array of records or an object
    /// with a `regulations` array.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let records = match serde_json::from_str::<TableDocument>(json)? {
            TableDocument::Bare(records) => records,
            TableDocument::Wrapped { regulations } => regulations,
        };
        Self::new(records)
    }

    /// Records in table order.
    pub fn records(&self) -> &[Regulation] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
