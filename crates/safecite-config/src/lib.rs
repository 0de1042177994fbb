#![deny(unsafe_code)]

//! Configuration loading and validation for SafeCite.
//!
//! Loads TOML configuration files and validates them. [`AppConfig`] is the
//! central configuration structure shared by the core engine, the MCP server
//! and the CLI.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable holding the hosted-API key.
pub const ENV_API_KEY: &str = "OSHA_API_KEY";

/// Environment variable overriding the hosted-API endpoint.
pub const ENV_API_URL: &str = "OSHA_API_URL";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tool server identity and deployment mode.
    #[serde(default)]
    pub server: ServerConfig,

    /// Locations of the regulation table and the manual.
    #[serde(default)]
    pub data: DataConfig,

    /// Classifier and text-search tuning.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Hosted compliance API used in proxy mode.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How `compliance_check` is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMode {
    /// Classify the query and search the local table or manual.
    #[default]
    Local,
    /// Forward the scenario to the hosted compliance API.
    Proxy,
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMode::Local => write!(f, "local"),
            ServerMode::Proxy => write!(f, "proxy"),
        }
    }
}

/// Tool server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported to the agent during the protocol handshake.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Deployment mode.
    #[serde(default)]
    pub mode: ServerMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            mode: ServerMode::default(),
        }
    }
}

fn default_server_name() -> String {
    "osha-compliance-assistant".to_string()
}

/// Paths to the read-only knowledge inputs.
///
/// Either file may be absent; the engine then treats it as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON regulation table.
    #[serde(default = "default_regulations_path")]
    pub regulations_path: PathBuf,

    /// Plain-text manual, searched line by line.
    #[serde(default = "default_manual_path")]
    pub manual_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            regulations_path: default_regulations_path(),
            manual_path: default_manual_path(),
        }
    }
}

fn default_regulations_path() -> PathBuf {
    PathBuf::from("data/regulations.json")
}

fn default_manual_path() -> PathBuf {
    PathBuf::from("data/osha_manual.txt")
}

/// Classifier and text-search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Queries with fewer words than this are answered from the table.
    #[serde(default = "default_word_threshold")]
    pub word_threshold: usize,

    /// Manual lines included on each side of a matching line.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Maximum number of context windows per search.
    #[serde(default = "default_max_windows")]
    pub max_windows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            word_threshold: default_word_threshold(),
            context_lines: default_context_lines(),
            max_windows: default_max_windows(),
        }
    }
}

fn default_word_threshold() -> usize {
    12
}

fn default_context_lines() -> usize {
    5
}

fn default_max_windows() -> usize {
    3
}

/// Hosted compliance API configuration.
///
/// ## TOML Example
///
/// ```toml
/// [server]
/// mode = "proxy"
///
/// [proxy]
/// api_url = "https://os.qcguard.xyz/api/compliance_check"
/// timeout_secs = 30
/// ```
///
/// The key is normally supplied through `OSHA_API_KEY` rather than the file.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Endpoint receiving `{"scenario": ...}` POST requests.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key sent as `X-API-Key`. Empty means "not configured".
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProxyConfig {
    /// Whether an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn default_api_url() -> String {
    "https://os.qcguard.xyz/api/compliance_check".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "[REDACTED]" }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `OSHA_API_KEY` / `OSHA_API_URL` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply environment-style overrides from an arbitrary lookup.
    ///
    /// Empty values are ignored. The result is re-validated.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            debug!("API key taken from {ENV_API_KEY}");
            self.proxy.api_key = key.trim().to_string();
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!(url = %url, "API endpoint taken from {ENV_API_URL}");
            self.proxy.api_url = url.trim().to_string();
        }
        self.validate()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.name must not be empty".to_string(),
            ));
        }
        if self.engine.word_threshold == 0 {
            return Err(ConfigError::Validation(
                "engine.word_threshold must be at least 1".to_string(),
            ));
        }
        if self.engine.max_windows == 0 {
            return Err(ConfigError::Validation(
                "engine.max_windows must be at least 1".to_string(),
            ));
        }
        if self.proxy.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "proxy.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.server.mode == ServerMode::Proxy
            && !(self.proxy.api_url.starts_with("http://")
                || self.proxy.api_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "proxy.api_url must be an http(s) URL, got {:?}",
                self.proxy.api_url
            )));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }
        Ok(())
    }

    /// A copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.proxy.api_key = redact(&self.proxy.api_key).to_string();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.name, "osha-compliance-assistant");
        assert_eq!(config.server.mode, ServerMode::Local);
        assert_eq!(config.engine.word_threshold, 12);
        assert_eq!(config.engine.context_lines, 5);
        assert_eq!(config.engine.max_windows, 3);
        assert_eq!(config.proxy.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(!config.proxy.has_api_key());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(
            config.data.regulations_path,
            PathBuf::from("data/regulations.json")
        );
        assert_eq!(config.data.manual_path, PathBuf::from("data/osha_manual.txt"));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [server]
            name = "site-safety"
            mode = "proxy"

            [data]
            regulations_path = "/srv/osha/regs.json"
            manual_path = "/srv/osha/1910.txt"

            [engine]
            word_threshold = 8
            context_lines = 2
            max_windows = 5

            [proxy]
            api_url = "http://localhost:8080/check"
            timeout_secs = 10

            [logging]
            level = "debug"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.server.name, "site-safety");
        assert_eq!(config.server.mode, ServerMode::Proxy);
        assert_eq!(config.data.manual_path, PathBuf::from("/srv/osha/1910.txt"));
        assert_eq!(config.engine.word_threshold, 8);
        assert_eq!(config.engine.context_lines, 2);
        assert_eq!(config.engine.max_windows, 5);
        assert_eq!(config.proxy.api_url, "http://localhost:8080/check");
        assert_eq!(config.proxy.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_unknown_mode() {
        let toml = r#"
            [server]
            mode = "hybrid"
        "#;
        assert!(matches!(AppConfig::parse(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        let toml = r#"
            [server]
            name = "  "
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_threshold() {
        let toml = r#"
            [engine]
            word_threshold = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_windows() {
        let toml = r#"
            [engine]
            max_windows = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_zero_context_lines_allowed() {
        let toml = r#"
            [engine]
            context_lines = 0
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.engine.context_lines, 0);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let toml = r#"
            [proxy]
            timeout_secs = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url_in_proxy_mode() {
        let toml = r#"
            [server]
            mode = "proxy"

            [proxy]
            api_url = "ftp://example.com"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_bad_url_ignored_in_local_mode() {
        let toml = r#"
            [proxy]
            api_url = "not a url"
        "#;
        assert!(AppConfig::parse(toml).is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let toml = r#"
            [logging]
            level = "loud"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    // ── Environment overrides ─────────────────────────────────────────

    #[test]
    fn test_overrides_apply_key_and_url() {
        let mut config = AppConfig::default();
        config
            .apply_overrides_from(|name| match name {
                ENV_API_KEY => Some(" key-123 ".to_string()),
                ENV_API_URL => Some("https://compliance.example.com/check".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.proxy.api_key, "key-123");
        assert_eq!(config.proxy.api_url, "https://compliance.example.com/check");
        assert!(config.proxy.has_api_key());
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let mut config = AppConfig::default();
        config.proxy.api_key = "from-file".to_string();
        config
            .apply_overrides_from(|_| Some(String::new()))
            .unwrap();
        assert_eq!(config.proxy.api_key, "from-file");
        assert_eq!(config.proxy.api_url, default_api_url());
    }

    #[test]
    fn test_overrides_revalidate() {
        let mut config = AppConfig::default();
        config.server.mode = ServerMode::Proxy;
        let result = config.apply_overrides_from(|name| {
            (name == ENV_API_URL).then(|| "localhost:9000".to_string())
        });
        assert!(result.is_err());
    }

    // ── Redaction ─────────────────────────────────────────────────────

    #[test]
    fn test_debug_hides_api_key() {
        let mut config = AppConfig::default();
        config.proxy.api_key = "super-secret-key".to_string();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_redacted_copy_for_display() {
        let mut config = AppConfig::default();
        config.proxy.api_key = "super-secret-key".to_string();
        let shown = toml::to_string_pretty(&config.redacted()).unwrap();
        assert!(!shown.contains("super-secret-key"));
        assert_eq!(config.proxy.api_key, "super-secret-key");
    }

    #[test]
    fn test_redacted_leaves_missing_key_empty() {
        let config = AppConfig::default().redacted();
        assert_eq!(config.proxy.api_key, "");
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("safecite.toml");
        tokio::fs::write(
            &path,
            b"[engine]\nword_threshold = 20\n\n[logging]\nlevel = \"warn\"\n",
        )
        .await
        .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.engine.word_threshold, 20);
        assert_eq!(config.logging.level, "warn");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/safecite.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ServerMode::Local.to_string(), "local");
        assert_eq!(ServerMode::Proxy.to_string(), "proxy");
    }
}
