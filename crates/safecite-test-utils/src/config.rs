//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use std::path::Path;

use safecite_config::{AppConfig, ServerMode};

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .mode(ServerMode::Proxy)
///     .api_key("test-key")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn mode(mut self, mode: ServerMode) -> Self {
        self.config.server.mode = mode;
        self
    }

    pub fn data_paths(mut self, regulations: &Path, manual: &Path) -> Self {
        self.config.data.regulations_path = regulations.to_path_buf();
        self.config.data.manual_path = manual.to_path_buf();
        self
    }

    pub fn word_threshold(mut self, words: usize) -> Self {
        self.config.engine.word_threshold = words;
        self
    }

    pub fn context_lines(mut self, lines: usize) -> Self {
        self.config.engine.context_lines = lines;
        self
    }

    pub fn max_windows(mut self, windows: usize) -> Self {
        self.config.engine.max_windows = windows;
        self
    }

    pub fn api_url(mut self, url: &str) -> Self {
        self.config.proxy.api_url = url.to_string();
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.config.proxy.api_key = key.to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.proxy.timeout_secs = secs;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
