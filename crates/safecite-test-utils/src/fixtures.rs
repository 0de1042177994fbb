//! Knowledge-data fixtures.
//!
//! [`SAMPLE_REGULATIONS`] and [`SAMPLE_MANUAL`] are small but cover every
//! verdict kind. [`TestData`] writes them into a temp directory and hands
//! back a config that points at the files.

use std::path::PathBuf;

use safecite_config::AppConfig;
use tempfile::TempDir;

use crate::config::TestConfigBuilder;

/// Five records, one per verdict kind plus a second NOT COMPLIANT.
///
/// Order matters: `1910.28` comes first so "guardrail" queries hit it before
/// anything else.
pub const SAMPLE_REGULATIONS: &str = r#"[
  {
    "id": "1910.28",
    "citation": "1910.28(b)(1)(i)",
    "decision": "NOT COMPLIANT",
    "icon": "⛔",
    "summary": "Each employee on a walking-working surface with an unprotected side or edge 4 feet or more above a lower level must be protected by guardrails, safety nets or personal fall arrest systems.",
    "penalty_range": "$1,000 - $16,131 per serious violation",
    "question_patterns": ["guardrail", "unprotected edge", "fall protection"]
  },
  {
    "id": "1910.147",
    "citation": "1910.147(c)(4)(i)",
    "decision": "NOT COMPLIANT",
    "icon": "⛔",
    "summary": "Procedures must be developed, documented and used for the control of potentially hazardous energy during servicing and maintenance.",
    "penalty_range": "$1,000 - $16,131 per serious violation",
    "question_patterns": ["lockout", "tagout", "loto"]
  },
  {
    "id": "1910.178",
    "citation": "1910.178(l)(1)(i)",
    "decision": "COMPLIANT",
    "icon": "✅",
    "summary": "A trained and evaluated operator may operate a powered industrial truck.",
    "question_patterns": ["certified forklift", "trained operator"]
  },
  {
    "id": "1910.141",
    "citation": "1910.141(c)(1)(i)",
    "decision": "PROHIBITED",
    "icon": "🚫",
    "summary": "Employers must provide toilet facilities and may not impose unreasonable restrictions on their use.",
    "question_patterns": ["restroom", "toilet"]
  },
  {
    "id": "1910.157",
    "citation": "1910.157(e)(3)",
    "decision": "REVIEW REQUIRED",
    "icon": "⚠️",
    "summary": "Portable extinguishers must be maintained and given an annual maintenance check.",
    "question_patterns": ["fire extinguisher"]
  }
]"#;

/// A short excerpt in the shape of the real manual: section headings
/// followed by body lines.
pub const SAMPLE_MANUAL: &str = "\
OSHA General Industry Standards (29 CFR 1910) - Excerpt
Subpart D - Walking-Working Surfaces
1910.22 General requirements.
All places of employment, passageways, storerooms and service rooms shall be kept clean and orderly.
The floor of every workroom shall be maintained in a clean and, so far as possible, a dry condition.
1910.23 Ladders.
Ladder rungs, steps and cleats must be parallel, level and uniformly spaced when the ladder is in position for use.
1910.28 Duty to have fall protection and falling object protection.
Guardrail systems, safety net systems or personal fall arrest systems are required at 4 feet.
Subpart E - Exit Routes and Emergency Planning
1910.36 Design and construction requirements for exit routes.
An exit route must be permanent and each exit must be separated by fire resistant materials.
1910.37 Maintenance, safeguards and operational features for exit routes.
Exit routes must be kept free of explosive or highly flammable furnishings and decorations.
Exit routes must be unobstructed by materials, equipment, locked doors or dead-end corridors.
Subpart J - General Environmental Controls
1910.141 Sanitation.
Toilet facilities, in toilet rooms separate for each sex, shall be provided in all places of employment.
1910.147 The control of hazardous energy (lockout/tagout).
Energy control procedures shall clearly and specifically outline the scope, purpose and techniques.
Subpart L - Fire Protection
1910.157 Portable fire extinguishers.
The employer shall assure that portable fire extinguishers are maintained in a fully charged and operable condition.
Subpart N - Materials Handling and Storage
1910.178 Powered industrial trucks.
Only trained and authorized operators shall be permitted to operate a powered industrial truck.
Subpart O - Machinery and Machine Guarding
1910.212 General requirements for all machines.
One or more methods of machine guarding shall be provided to protect the operator from hazards such as rotating parts.
";

/// Knowledge files in a temp directory, removed on drop.
pub struct TestData {
    pub regulations_path: PathBuf,
    pub manual_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestData {
    /// Write the sample table and manual.
    pub async fn sample() -> Self {
        Self::with_contents(Some(SAMPLE_REGULATIONS), Some(SAMPLE_MANUAL)).await
    }

    /// Write only the files given; `None` leaves that file absent.
    pub async fn with_contents(regulations: Option<&str>, manual: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let regulations_path = temp_dir.path().join("regulations.json");
        let manual_path = temp_dir.path().join("osha_manual.txt");

        if let Some(json) = regulations {
            tokio::fs::write(&regulations_path, json)
                .await
                .expect("failed to write regulations fixture");
        }
        if let Some(text) = manual {
            tokio::fs::write(&manual_path, text)
                .await
                .expect("failed to write manual fixture");
        }

        Self {
            regulations_path,
            manual_path,
            _temp_dir: temp_dir,
        }
    }

    /// A config builder already pointing at these files.
    pub fn config_builder(&self) -> TestConfigBuilder {
        TestConfigBuilder::new().data_paths(&self.regulations_path, &self.manual_path)
    }

    /// A default config pointing at these files.
    pub fn config(&self) -> AppConfig {
        self.config_builder().build()
    }
}
