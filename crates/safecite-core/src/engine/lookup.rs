//! Structured lookup against the regulation table.
//!
//! Matching is case-insensitive substring containment and strictly
//! first-match-wins in table order. No scoring.

use crate::data::{Regulation, RegulationTable};

/// Read-only search view over a [`RegulationTable`].
#[derive(Debug, Clone, Copy)]
pub struct StructuredLookup<'a> {
    table: &'a RegulationTable,
}

impl<'a> StructuredLookup<'a> {
    pub fn new(table: &'a RegulationTable) -> Self {
        Self { table }
    }

    /// First record with a question pattern contained in the query.
    ///
    /// If no pattern matches anywhere in the table, falls back to the first
    /// record whose id appears in the query.
    pub fn find_by_pattern(&self, query: &str) -> Option<&'a Regulation> {
        let query = query.to_lowercase();
        let records = self.table.records();

        records
            .iter()
            .find(|reg| {
                reg.question_patterns
                    .iter()
                    .any(|p| !p.is_empty() && query.contains(&p.to_lowercase()))
            })
            .or_else(|| {
                records
                    .iter()
                    .find(|reg| query.contains(&reg.id.to_lowercase()))
            })
    }

    /// First record whose id contains the citation.
    pub fn find_by_id(&self, citation: &str) -> Option<&'a Regulation> {
        let citation = citation.trim().to_lowercase();
        if citation.is_empty() {
            return None;
        }
        self.table
            .records()
            .iter()
            .find(|reg| reg.id.to_lowercase().contains(&citation))
    }
}
