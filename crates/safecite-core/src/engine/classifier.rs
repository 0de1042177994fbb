//! Query classifier. Decides between a quick table lookup and a manual search.
//!
//! Rules, in order:
//!
//! 1. An explicit `detailed` request always goes to the manual.
//! 2. A query containing a lite-trigger phrase goes to the table.
//! 3. A query shorter than the word threshold goes to the table.
//! 4. Everything else goes to the manual.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

/// Domain phrases the regulation table is known to cover, checked in order.
pub const LITE_TRIGGERS: &[&str] = &[
    "fall protection",
    "guardrail",
    "lockout",
    "tagout",
    "ppe",
    "personal protective",
    "hard hat",
    "safety glasses",
    "respirator",
    "sanitation",
    "restroom",
    "toilet",
    "drinking water",
    "forklift",
    "powered industrial truck",
    "ladder",
    "scaffold",
    "fire extinguisher",
    "exit route",
    "emergency exit",
    "eyewash",
    "eye wash",
    "hazard communication",
    "safety data sheet",
    "machine guard",
    "confined space",
    "first aid",
];

/// Default short-query threshold, in whitespace-delimited words.
pub const DEFAULT_WORD_THRESHOLD: usize = 12;

/// Caller-requested answer depth (`detail_level` tool argument).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    #[default]
    Quick,
    Detailed,
}

impl FromStr for DetailLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(DetailLevel::Quick),
            "detailed" => Ok(DetailLevel::Detailed),
            other => Err(format!("unknown detail level: {other}")),
        }
    }
}

/// Which data source a query should be answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Structured regulation table.
    Lite,
    /// Full-text manual search.
    Heavy,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Lite => write!(f, "lite"),
            QueryMode::Heavy => write!(f, "heavy"),
        }
    }
}

/// The rule that produced a classification. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierRule {
    ExplicitDetail,
    Trigger(&'static str),
    ShortQuery { words: usize },
    LongQuery { words: usize },
}

/// Outcome of [`QueryClassifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub mode: QueryMode,
    pub rule: ClassifierRule,
}

/// Pure, deterministic query classifier.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    word_threshold: usize,
}

impl QueryClassifier {
    pub fn new(word_threshold: usize) -> Self {
        Self { word_threshold }
    }

    /// Classify a query, honoring an explicit detail request first.
    pub fn classify(&self, query: &str, explicit_detail: Option<DetailLevel>) -> Classification {
        let classification = self.decide(query, explicit_detail);
        debug!(
            mode = %classification.mode,
            rule = ?classification.rule,
            "Query classified"
        );
        classification
    }

    fn decide(&self, query: &str, explicit_detail: Option<DetailLevel>) -> Classification {
        if explicit_detail == Some(DetailLevel::Detailed) {
            return Classification {
                mode: QueryMode::Heavy,
                rule: ClassifierRule::ExplicitDetail,
            };
        }

        let lowered = query.to_lowercase();
        if let Some(trigger) = LITE_TRIGGERS.iter().copied().find(|t| lowered.contains(t)) {
            return Classification {
                mode: QueryMode::Lite,
                rule: ClassifierRule::Trigger(trigger),
            };
        }

        let words = query.split_whitespace().count();
        if words < self.word_threshold {
            Classification {
                mode: QueryMode::Lite,
                rule: ClassifierRule::ShortQuery { words },
            }
        } else {
            Classification {
                mode: QueryMode::Heavy,
                rule: ClassifierRule::LongQuery { words },
            }
        }
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_THRESHOLD)
    }
}
