//! Tool registry with MCP-compatible tool definitions.
//!
//! Each tool has a name, a description and a JSON Schema for its
//! arguments. Definitions are listed in registration order so agents see
//! a stable tool list.

use serde::{Deserialize, Serialize};

use super::ToolName;

/// A tool as advertised to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (e.g. "compliance_check").
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// A registered tool with metadata.
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    pub tool: ToolName,
    pub definition: ToolDefinition,
    /// Disabled tools are neither listed nor dispatched.
    pub enabled: bool,
}

/// Ordered registry of the available tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry with the three compliance tools.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register a tool, replacing any earlier registration of the same tool.
    pub fn register(&mut self, tool: RegisteredTool) {
        match self.tools.iter_mut().find(|t| t.tool == tool.tool) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.definition.name == name)
    }

    /// Whether a tool is registered and enabled.
    pub fn is_enabled(&self, tool: ToolName) -> bool {
        self.tools.iter().any(|t| t.tool == tool && t.enabled)
    }

    /// Enable or disable a registered tool. Returns `false` if not registered.
    pub fn set_enabled(&mut self, tool: ToolName, enabled: bool) -> bool {
        match self.tools.iter_mut().find(|t| t.tool == tool) {
            Some(t) => {
                t.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Names of enabled tools, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.definition.name.as_str())
            .collect()
    }

    /// Definitions of enabled tools (for `tools/list`).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.definition.clone())
            .collect()
    }

    fn register_defaults(&mut self) {
        self.register(RegisteredTool {
            tool: ToolName::ComplianceCheck,
            definition: ToolDefinition {
                name: ToolName::ComplianceCheck.as_str().to_string(),
                description: "Check whether a workplace scenario complies with OSHA General \
                              Industry standards (29 CFR 1910). Returns a cited verdict, the \
                              relevant regulation section, and corrective actions where required."
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "scenario": {
                            "type": "string",
                            "description": "Describe the workplace situation or safety question."
                        },
                        "detail_level": {
                            "type": "string",
                            "enum": ["quick", "detailed"],
                            "default": "quick",
                            "description": "'detailed' always searches the full manual."
                        }
                    },
                    "required": ["scenario"]
                }),
            },
            enabled: true,
        });

        self.register(RegisteredTool {
            tool: ToolName::CitationSearch,
            definition: ToolDefinition {
                name: ToolName::CitationSearch.as_str().to_string(),
                description: "Look up an OSHA regulation by section number (e.g. 1910.147)."
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "citation": {
                            "type": "string",
                            "description": "Regulation section number"
                        }
                    },
                    "required": ["citation"]
                }),
            },
            enabled: true,
        });

        self.register(RegisteredTool {
            tool: ToolName::FineCalculator,
            definition: ToolDefinition {
                name: ToolName::FineCalculator.as_str().to_string(),
                description: "Estimate the penalty range for a list of OSHA violations."
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "violations": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "One description per violation"
                        },
                        "violation_type": {
                            "type": "string",
                            "enum": ["serious", "willful", "repeat", "other"],
                            "default": "serious"
                        }
                    },
                    "required": ["violations"]
                }),
            },
            enabled: true,
        });
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
