//! Compliance engine: query classification and lookup.
//!
//! ## Pipelines
//!
//! ```text
//! compliance_check:  classify ──lite──▶ table lookup ──▶ format verdict
//!                        │                   │ (miss)
//!                        └──heavy──▶ manual search ◀──┘
//!
//! citation_search:   table lookup by id ──(miss)──▶ manual search
//! ```
//!
//! A lite query that misses the table falls through to the manual, so a
//! query is never answered "no match" while the manual could still help.

pub mod classifier;
pub mod fines;
pub mod format;
pub mod lookup;
pub mod search;

use std::sync::Arc;

use tracing::debug;

use safecite_config::EngineConfig;

use crate::data::KnowledgeBase;

pub use classifier::{Classification, ClassifierRule, DetailLevel, QueryClassifier, QueryMode};
pub use fines::{ViolationEstimate, ViolationType};
pub use format::format_regulation;
pub use lookup::StructuredLookup;
pub use search::{ContextWindow, TextSearch, WINDOW_SEPARATOR};

/// Shown when neither the table nor the manual has anything for a scenario.
pub const NO_MATCH_MESSAGE: &str = "No matching regulation found for this scenario. \
Describe the equipment, task or hazard more specifically, or ask again with \
detail_level \"detailed\" to search the full manual.";

/// Heading placed before manual excerpts.
pub const MANUAL_HEADING: &str = "📖 Relevant sections of the OSHA manual:";

/// Classifier plus lookups over a shared, read-only knowledge base.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    knowledge: Arc<KnowledgeBase>,
    classifier: QueryClassifier,
    context_lines: usize,
    max_windows: usize,
}

impl ComplianceEngine {
    /// Create an engine with the given tuning.
    pub fn new(knowledge: Arc<KnowledgeBase>, config: &EngineConfig) -> Self {
        Self {
            knowledge,
            classifier: QueryClassifier::new(config.word_threshold),
            context_lines: config.context_lines,
            max_windows: config.max_windows,
        }
    }

    /// The knowledge base this engine reads.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Answer a `compliance_check` scenario.
    pub fn check(&self, scenario: &str, detail: Option<DetailLevel>) -> String {
        let classification = self.classifier.classify(scenario, detail);

        if classification.mode == QueryMode::Lite {
            let lookup = StructuredLookup::new(self.knowledge.table());
            if let Some(reg) = lookup.find_by_pattern(scenario) {
                debug!(id = %reg.id, verdict = %reg.verdict(), "Regulation matched");
                return format_regulation(reg);
            }
            debug!("No table match, searching manual");
        }

        self.manual_excerpts(scenario)
            .unwrap_or_else(|| NO_MATCH_MESSAGE.to_string())
    }

    /// Answer a `citation_search` request.
    pub fn cite(&self, citation: &str) -> String {
        let lookup = StructuredLookup::new(self.knowledge.table());
        if let Some(reg) = lookup.find_by_id(citation) {
            debug!(id = %reg.id, "Citation matched");
            return format_regulation(reg);
        }

        self.manual_excerpts(citation).unwrap_or_else(|| {
            format!(
                "No regulation found for citation \"{}\". Check the section number \
                 (e.g. 1910.147) and try again.",
                citation.trim()
            )
        })
    }

    fn manual_excerpts(&self, query: &str) -> Option<String> {
        let body = TextSearch::new(self.knowledge.manual())
            .with_context_lines(self.context_lines)
            .with_max_windows(self.max_windows)
            .render(query);
        debug!(matched = body.is_some(), "Manual searched");
        body.map(|body| format!("{MANUAL_HEADING}\n\n{body}"))
    }
}
