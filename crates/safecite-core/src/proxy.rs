//! Remote compliance backend.
//!
//! In proxy mode `compliance_check` is forwarded to a hosted endpoint
//! instead of the local engine. The endpoint takes `{"scenario": ...}` with
//! an `X-API-Key` header and answers with JSON carrying the text under
//! `answer`, `response` or `result`.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use safecite_config::ProxyConfig;

use crate::BoxFuture;

/// Errors from the remote backend. Each maps to a fixed user-facing reply.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("authentication failed (check API key)")]
    Unauthorized,

    #[error("daily request limit reached")]
    RateLimited,

    #[error("timeout")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("response parse error: {0}")]
    Parse(String),
}

impl ProxyError {
    /// Text returned to the agent in place of an answer.
    pub fn user_message(&self) -> String {
        match self {
            ProxyError::MissingApiKey => "❌ OSHA_API_KEY not set.".to_string(),
            ProxyError::Unauthorized => "❌ Invalid API key.".to_string(),
            ProxyError::RateLimited => "🛑 Daily limit reached.".to_string(),
            ProxyError::Timeout => "❌ Request timed out. Please try again.".to_string(),
            ProxyError::Status(code) => format!("❌ API error ({code}). Please try again."),
            ProxyError::Network(detail) | ProxyError::Parse(detail) => {
                format!("❌ Error: {detail}")
            }
        }
    }
}

/// A backend that can answer a compliance scenario.
///
/// Uses `BoxFuture` so the dispatcher can hold an `Arc<dyn RemoteChecker>`.
pub trait RemoteChecker: Send + Sync {
    /// Backend display name for logs.
    fn name(&self) -> &str;

    /// Whether the backend has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }

    /// Answer one scenario.
    fn check(&self, scenario: &str) -> BoxFuture<'_, Result<String, ProxyError>>;
}

/// HTTP client for the hosted compliance endpoint.
pub struct ProxyClient {
    client: Client,
    api_url: String,
    api_key: Zeroizing<String>,
}

impl ProxyClient {
    /// Build a client from the `[proxy]` section.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProxyError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: Zeroizing::new(config.api_key.trim().to_string()),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    scenario: &'a str,
}

impl RemoteChecker for ProxyClient {
    fn name(&self) -> &str {
        "osha-api"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn check(&self, scenario: &str) -> BoxFuture<'_, Result<String, ProxyError>> {
        let scenario = scenario.to_string();
        Box::pin(async move {
            if self.api_key.is_empty() {
                return Err(ProxyError::MissingApiKey);
            }
            debug!(url = %self.api_url, "Forwarding compliance check");

            let resp = self
                .client
                .post(&self.api_url)
                .header("X-API-Key", self.api_key.as_str())
                .json(&CheckRequest {
                    scenario: &scenario,
                })
                .send()
                .await
                .map_err(map_send_error)?;

            let status = resp.status().as_u16();
            debug!(status, "Remote backend replied");
            match status {
                200 => {}
                401 => return Err(ProxyError::Unauthorized),
                429 => return Err(ProxyError::RateLimited),
                other => return Err(ProxyError::Status(other)),
            }

            let body: Value = resp.json().await.map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Timeout
                } else {
                    ProxyError::Parse(e.to_string())
                }
            })?;
            Ok(extract_answer(&body))
        })
    }
}

fn map_send_error(e: reqwest::Error) -> ProxyError {
    if e.is_timeout() {
        ProxyError::Timeout
    } else {
        ProxyError::Network(e.to_string())
    }
}

/// Pull the answer text out of a backend response.
///
/// Tries `answer`, then `response`, then `result`, skipping empty values
/// (`null`, `""`, `false`, `0`, `[]`, `{}`). Anything else is returned as its
/// JSON text.
pub fn extract_answer(body: &Value) -> String {
    let found = ["answer", "response", "result"]
        .iter()
        .filter_map(|key| body.get(key))
        .find(|v| !is_empty_value(v));
    match found.unwrap_or(body) {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
