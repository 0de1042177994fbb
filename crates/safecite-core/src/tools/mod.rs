//! Tool names, argument parsing, registry and dispatch.
//!
//! Tool names parse into the closed [`ToolName`] enum and arguments into a
//! typed [`ToolCall`], so every route is covered by an exhaustive `match`.

pub mod dispatch;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::engine::{DetailLevel, ViolationType};

pub use dispatch::ToolDispatcher;
pub use registry::{RegisteredTool, ToolDefinition, ToolRegistry};

/// Reply for a tool name outside the closed set.
pub const UNKNOWN_TOOL_MESSAGE: &str = "Unknown tool.";

pub const MISSING_SCENARIO_MESSAGE: &str = "Please provide a scenario to check.";
pub const MISSING_CITATION_MESSAGE: &str =
    "Please provide a citation to look up (e.g. 1910.147).";
pub const MISSING_VIOLATIONS_MESSAGE: &str =
    "Please provide the list of violations to estimate.";

/// The tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ComplianceCheck,
    CitationSearch,
    FineCalculator,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [
        ToolName::ComplianceCheck,
        ToolName::CitationSearch,
        ToolName::FineCalculator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::ComplianceCheck => "compliance_check",
            ToolName::CitationSearch => "citation_search",
            ToolName::FineCalculator => "fine_calculator",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown tool: {s}"))
    }
}

/// A fully-parsed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ComplianceCheck {
        scenario: String,
        detail: Option<DetailLevel>,
    },
    CitationSearch {
        citation: String,
    },
    FineCalculator {
        violations: Vec<String>,
        violation_type: ViolationType,
    },
}

impl ToolCall {
    /// Parse the JSON arguments for `tool`.
    ///
    /// A missing required argument yields the fixed user-facing message as
    /// the error. Optional arguments with unrecognised values fall back to
    /// their defaults.
    pub fn parse(tool: ToolName, arguments: &Value) -> Result<Self, &'static str> {
        match tool {
            ToolName::ComplianceCheck => {
                let scenario =
                    non_empty_str(arguments, "scenario").ok_or(MISSING_SCENARIO_MESSAGE)?;
                let detail = arguments
                    .get("detail_level")
                    .and_then(Value::as_str)
                    .map(|s| s.parse().unwrap_or_default());
                Ok(ToolCall::ComplianceCheck { scenario, detail })
            }
            ToolName::CitationSearch => {
                let citation =
                    non_empty_str(arguments, "citation").ok_or(MISSING_CITATION_MESSAGE)?;
                Ok(ToolCall::CitationSearch { citation })
            }
            ToolName::FineCalculator => {
                let violations = match arguments.get("violations") {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(|v| match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect(),
                    Some(Value::String(single)) if !single.trim().is_empty() => {
                        vec![single.clone()]
                    }
                    _ => return Err(MISSING_VIOLATIONS_MESSAGE),
                };
                let violation_type = arguments
                    .get("violation_type")
                    .and_then(Value::as_str)
                    .map(ViolationType::parse_or_default)
                    .unwrap_or_default();
                Ok(ToolCall::FineCalculator {
                    violations,
                    violation_type,
                })
            }
        }
    }

    pub fn tool(&self) -> ToolName {
        match self {
            ToolCall::ComplianceCheck { .. } => ToolName::ComplianceCheck,
            ToolCall::CitationSearch { .. } => ToolName::CitationSearch,
            ToolCall::FineCalculator { .. } => ToolName::FineCalculator,
        }
    }
}

fn non_empty_str(arguments: &Value, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
