//! Fuzz target for the compliance engine.
//!
//! Run with: cargo +nightly fuzz run fuzz_query_engine
//!
//! Runs arbitrary scenario and citation text against the shipped knowledge
//! data. Window bounds must hold for every input.

#![no_main]

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;
use safecite_config::EngineConfig;
use safecite_core::data::{KnowledgeBase, ManualText, RegulationTable};
use safecite_core::engine::{ComplianceEngine, DetailLevel, TextSearch};

fn engine() -> &'static ComplianceEngine {
    static ENGINE: OnceLock<ComplianceEngine> = OnceLock::new();
    ENGINE.get_or_init(|| {
        let table = RegulationTable::from_json(include_str!("../data/regulations.json"))
            .unwrap_or_default();
        let manual = ManualText::from_text(include_str!("../data/osha_manual.txt"));
        ComplianceEngine::new(
            Arc::new(KnowledgeBase::from_parts(table, manual)),
            &EngineConfig::default(),
        )
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(query) = std::str::from_utf8(data) else {
        return;
    };
    let engine = engine();
    let _ = engine.check(query, None);
    let _ = engine.check(query, Some(DetailLevel::Detailed));
    let _ = engine.cite(query);

    let windows = TextSearch::new(engine.knowledge().manual()).search(query);
    assert!(windows.len() <= 3);
    assert!(windows.iter().all(|w| w.line_count() <= 11));
});
