#![deny(unsafe_code)]

//! SafeCite core: OSHA compliance tools served over MCP.
//!
//! Three tools answer workplace-safety questions from a curated regulation
//! table and the plain-text OSHA manual: `compliance_check`,
//! `citation_search` and `fine_calculator`. The [`mcp`] module exposes them
//! to agents over stdio; the [`tools`] module routes calls; the [`engine`]
//! does the actual classification, lookup and formatting.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future for async trait methods that
/// must stay object-safe (`dyn Trait`).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Regulation table and manual text.
pub mod data;
/// Query classification, lookups, formatting and penalty estimates.
pub mod engine;
/// JSON-RPC server for the Model Context Protocol.
pub mod mcp;
/// Remote compliance backend used in proxy mode.
pub mod proxy;
/// Startup wiring from config to a ready dispatcher.
pub mod service;
/// Tool names, registry and dispatch.
pub mod tools;

pub use data::{DataError, KnowledgeBase};
pub use engine::ComplianceEngine;
pub use mcp::{McpServer, ServerError};
pub use proxy::{ProxyClient, ProxyError, RemoteChecker};
pub use service::{InitError, build_server, init};
pub use tools::{ToolDispatcher, ToolName, ToolRegistry};
