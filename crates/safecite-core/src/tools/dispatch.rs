//! Tool dispatch. Routes a named call to the engine or the remote backend.
//!
//! Every call produces text. Unknown tools, missing arguments and backend
//! failures all become fixed user-facing messages rather than protocol
//! errors, so the agent always has something to show.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::engine::{ComplianceEngine, fines};
use crate::proxy::{ProxyError, RemoteChecker};

use super::{ToolCall, ToolName, ToolRegistry, UNKNOWN_TOOL_MESSAGE};

/// Why a tool call did not produce an engine answer.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("remote backend failed: {0}")]
    Remote(#[from] ProxyError),

    #[error("tool task failed: {0}")]
    TaskFailed(String),
}

impl DispatchError {
    /// Text returned to the agent for this failure.
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::UnknownTool(_) => UNKNOWN_TOOL_MESSAGE.to_string(),
            DispatchError::MissingArgument(message) => message.to_string(),
            DispatchError::Remote(e) => e.user_message(),
            DispatchError::TaskFailed(detail) => format!("❌ Error: {detail}"),
        }
    }
}

/// Routes tool calls. Shared across requests behind an `Arc`.
pub struct ToolDispatcher {
    engine: ComplianceEngine,
    registry: ToolRegistry,
    remote: Option<Arc<dyn RemoteChecker>>,
}

impl ToolDispatcher {
    /// A dispatcher answering everything locally with the default tools.
    pub fn new(engine: ComplianceEngine) -> Self {
        Self {
            engine,
            registry: ToolRegistry::with_defaults(),
            remote: None,
        }
    }

    /// Forward `compliance_check` to a remote backend.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteChecker>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    /// Whether `compliance_check` goes to a remote backend.
    pub fn is_proxied(&self) -> bool {
        self.remote.is_some()
    }

    /// Run a tool call and return its text.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> String {
        match self.try_dispatch(name, arguments).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    DispatchError::Remote(inner) => {
                        warn!(tool = name, error = %inner, "Remote check failed")
                    }
                    other => debug!(tool = name, error = %other, "Tool call rejected"),
                }
                e.user_message()
            }
        }
    }

    /// Run a tool call, keeping the failure reason.
    pub async fn try_dispatch(&self, name: &str, arguments: &Value) -> Result<String, DispatchError> {
        let tool: ToolName = name
            .parse()
            .map_err(|_| DispatchError::UnknownTool(name.to_string()))?;
        if !self.registry.is_enabled(tool) {
            return Err(DispatchError::UnknownTool(name.to_string()));
        }
        // A proxied check reports a missing key before looking at arguments.
        if tool == ToolName::ComplianceCheck {
            if let Some(remote) = self.remote.as_ref().filter(|r| !r.is_configured()) {
                debug!(backend = remote.name(), "Remote backend has no credentials");
                return Err(ProxyError::MissingApiKey.into());
            }
        }

        let call = ToolCall::parse(tool, arguments).map_err(DispatchError::MissingArgument)?;
        debug!(tool = %tool, "Dispatching tool call");

        match call {
            ToolCall::ComplianceCheck { scenario, detail } => match &self.remote {
                Some(remote) => {
                    debug!(backend = remote.name(), "Using remote backend");
                    Ok(remote.check(&scenario).await?)
                }
                None => Ok(self.engine.check(&scenario, detail)),
            },
            ToolCall::CitationSearch { citation } => Ok(self.engine.cite(&citation)),
            ToolCall::FineCalculator {
                violations,
                violation_type,
            } => {
                let est = fines::estimate(&violations, violation_type);
                Ok(fines::format_estimate(&violations, violation_type, &est))
            }
        }
    }

    /// Run a tool call on its own task.
    ///
    /// A panic inside the call is contained to that task and reported as an
    /// error message; the caller keeps serving.
    pub async fn dispatch_isolated(self: &Arc<Self>, name: String, arguments: Value) -> String {
        let this = Arc::clone(self);
        let tool = name.clone();
        let task = tokio::spawn(async move { this.dispatch(&name, &arguments).await });
        match task.await {
            Ok(text) => text,
            Err(join_err) => {
                error!(tool = %tool, error = %join_err, "Tool call task failed");
                let detail = if join_err.is_panic() {
                    "internal failure while handling the request".to_string()
                } else {
                    "request was cancelled".to_string()
                };
                DispatchError::TaskFailed(detail).user_message()
            }
        }
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.registry.names())
            .field("remote", &self.remote.as_ref().map(|r| r.name().to_string()))
            .finish()
    }
}
