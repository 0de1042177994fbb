//! MCP server loop: newline-delimited JSON-RPC on a byte stream.
//!
//! stdout carries protocol messages only. All diagnostics go through
//! `tracing`, which the binary points at stderr.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::tools::ToolDispatcher;

use super::protocol::*;

/// Errors that end the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Replies waiting for the writer.
const REPLY_QUEUE: usize = 64;

/// Answers `initialize`, `ping`, `tools/list` and `tools/call`.
///
/// Cheap to clone: each in-flight request holds its own handle.
#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<ToolDispatcher>,
    name: String,
    version: String,
}

impl McpServer {
    pub fn new(dispatcher: Arc<ToolDispatcher>, name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serve stdin/stdout until EOF or Ctrl-C.
    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        info!(server = %self.name, "MCP server listening on stdio");
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        tokio::select! {
            res = self.serve(stdin, stdout) => res?,
            _ = tokio::signal::ctrl_c() => {
                warn!("Ctrl-C received, shutting down");
            }
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Read one message per line from `reader`, write replies to `writer`.
    ///
    /// Each request runs on its own task, so replies go out in completion
    /// order, not arrival order. Blank lines are skipped. Returns once the
    /// reader hits EOF and every in-flight request has replied.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(REPLY_QUEUE);

        let read_loop = async move {
            let mut lines = reader.lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "<- message");

                let server = self.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let Some(response) = server.handle_message(&line).await else {
                        return;
                    };
                    if tx.send(response).await.is_err() {
                        warn!("Reply dropped, writer closed");
                    }
                });
            }
            debug!("Input closed");
            Ok::<(), ServerError>(())
        };

        let write_loop = async {
            while let Some(response) = rx.recv().await {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
            Ok::<(), ServerError>(())
        };

        tokio::try_join!(read_loop, write_loop)?;
        Ok(())
    }

    /// Handle one raw message. `None` means no reply is owed.
    pub async fn handle_message(&self, msg: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(msg) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(Value::Null, PARSE_ERROR, e.to_string()));
            }
        };

        let id_hint = raw.get("id").cloned().unwrap_or(Value::Null);
        let req: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id_hint,
                    INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ));
            }
        };

        if req.is_notification() {
            debug!(method = %req.method, "Notification");
            return None;
        }

        let id = req.id.clone().unwrap_or(Value::Null);
        Some(self.handle_request(id, req).await)
    }

    async fn handle_request(&self, id: Value, req: JsonRpcRequest) -> JsonRpcResponse {
        match req.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.into(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability {
                            list_changed: false,
                        },
                    },
                    server_info: ServerInfo {
                        name: self.name.clone(),
                        version: self.version.clone(),
                    },
                };
                reply(id, result)
            }

            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),

            "tools/list" => {
                let result = ToolsListResult {
                    tools: self.dispatcher.registry().definitions(),
                };
                reply(id, result)
            }

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(req.params) {
                    Ok(p) => p,
                    Err(e) => return JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()),
                };
                info!(tool = %params.name, "Tool call");
                let text = self
                    .dispatcher
                    .dispatch_isolated(params.name, params.arguments)
                    .await;
                reply(id, ToolCallResult::text(text))
            }

            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
            ),
        }
    }
}

fn reply<T: serde::Serialize>(id: Value, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {e}")),
    }
}
