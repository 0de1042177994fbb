//! Startup wiring: config → knowledge base → engine → dispatcher.

use std::sync::Arc;

use tracing::info;

use safecite_config::{AppConfig, ServerMode};

use crate::data::{DataError, KnowledgeBase};
use crate::engine::ComplianceEngine;
use crate::mcp::McpServer;
use crate::proxy::{ProxyClient, ProxyError};
use crate::tools::ToolDispatcher;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to load knowledge data: {0}")]
    Data(#[from] DataError),

    #[error("failed to build proxy client: {0}")]
    Proxy(#[from] ProxyError),
}

/// Load data and build the dispatcher described by `config`.
///
/// Data errors are fatal here; a missing API key is not, since the proxy
/// reports it on each call instead.
pub async fn init(config: &AppConfig) -> Result<Arc<ToolDispatcher>, InitError> {
    let knowledge = Arc::new(KnowledgeBase::load(&config.data).await?);
    let engine = ComplianceEngine::new(knowledge, &config.engine);
    let mut dispatcher = ToolDispatcher::new(engine);

    if config.server.mode == ServerMode::Proxy {
        let client = ProxyClient::new(&config.proxy)?;
        info!(
            url = %client.api_url(),
            key_configured = config.proxy.has_api_key(),
            "Forwarding compliance_check to remote backend"
        );
        dispatcher = dispatcher.with_remote(Arc::new(client));
    }

    Ok(Arc::new(dispatcher))
}

/// Build the MCP server for `config`.
pub async fn build_server(config: &AppConfig) -> Result<McpServer, InitError> {
    let dispatcher = init(config).await?;
    Ok(McpServer::new(dispatcher, config.server.name.clone()))
}
