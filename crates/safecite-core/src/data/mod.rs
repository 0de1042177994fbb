//! Knowledge data: the regulation table and the manual text.
//!
//! Both are loaded once during startup and never mutated afterwards. A
//! missing file is not an error: the corresponding source is simply empty
//! and every search against it reports no match.

pub mod manual;
pub mod regulation;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use safecite_config::DataConfig;

pub use manual::ManualText;
pub use regulation::{Regulation, RegulationTable, Verdict};

/// Errors raised while loading knowledge data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed regulation table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate regulation id: {0:?}")]
    DuplicateId(String),

    #[error("regulation at index {index} has an empty id")]
    EmptyId { index: usize },
}

/// Everything the engine consults, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    table: RegulationTable,
    manual: ManualText,
}

impl KnowledgeBase {
    /// Assemble a knowledge base from already-loaded parts.
    pub fn from_parts(table: RegulationTable, manual: ManualText) -> Self {
        Self { table, manual }
    }

    /// Load the table and manual named by the data config.
    pub async fn load(config: &DataConfig) -> Result<Self, DataError> {
        let table = match read_optional(&config.regulations_path).await? {
            Some(json) => RegulationTable::from_json(&json)?,
            None => RegulationTable::empty(),
        };
        let manual = match read_optional(&config.manual_path).await? {
            Some(text) => ManualText::from_text(&text),
            None => ManualText::empty(),
        };

        info!(
            regulations = table.len(),
            manual_lines = manual.len(),
            "Knowledge base loaded"
        );
        Ok(Self { table, manual })
    }

    pub fn table(&self) -> &RegulationTable {
        &self.table
    }

    pub fn manual(&self) -> &ManualText {
        &self.manual
    }
}

/// Read a file, treating "not found" as absent.
async fn read_optional(path: &Path) -> Result<Option<String>, DataError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Data file not found, treating as empty");
            Ok(None)
        }
        Err(source) => Err(DataError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHIPPED_TABLE: &str = include_str!("../../../../data/regulations.json");
    const SHIPPED_MANUAL: &str = include_str!("../../../../data/osha_manual.txt");

    #[test]
    fn test_shipped_table_is_valid() {
        let table = RegulationTable::from_json(SHIPPED_TABLE).unwrap();
        assert!(!table.is_empty());
        assert!(
            table
                .records()
                .iter()
                .all(|r| !r.question_patterns.is_empty())
        );
    }

    #[test]
    fn test_shipped_manual_not_empty() {
        assert!(ManualText::from_text(SHIPPED_MANUAL).len() > 20);
    }

    #[tokio::test]
    async fn test_load_missing_files_is_empty() {
        let tmp = TempDir::new().unwrap();
        let config = DataConfig {
            regulations_path: tmp.path().join("nope.json"),
            manual_path: tmp.path().join("nope.txt"),
        };
        let kb = KnowledgeBase::load(&config).await.unwrap();
        assert!(kb.table().is_empty());
        assert!(kb.manual().is_empty());
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let tmp = TempDir::new().unwrap();
        let regs = tmp.path().join("regs.json");
        let manual = tmp.path().join("manual.txt");
        tokio::fs::write(
            &regs,
            r#"[{"id":"1910.147","citation":"1910.147","decision":"COMPLIANT","summary":"s","question_patterns":["lockout"]}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(&manual, "line one\nline two\n").await.unwrap();

        let kb = KnowledgeBase::load(&DataConfig {
            regulations_path: regs,
            manual_path: manual,
        })
        .await
        .unwrap();
        assert_eq!(kb.table().len(), 1);
        assert_eq!(kb.manual().len(), 2);
    }

    #[tokio::test]
    async fn test_load_malformed_table_fails() {
        let tmp = TempDir::new().unwrap();
        let regs = tmp.path().join("regs.json");
        tokio::fs::write(&regs, "[{").await.unwrap();

        let result = KnowledgeBase::load(&DataConfig {
            regulations_path: regs,
            manual_path: tmp.path().join("missing.txt"),
        })
        .await;
        assert!(matches!(result, Err(DataError::Json(_))));
    }

    #[tokio::test]
    async fn test_load_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = KnowledgeBase::load(&DataConfig {
            regulations_path: tmp.path().to_path_buf(),
            manual_path: tmp.path().join("missing.txt"),
        })
        .await;
        assert!(matches!(result, Err(DataError::Io { .. })));
    }
}
