//! Configuration for the search engine client.

/// Connection configuration for the search engine client.
///
/// Constructed once at startup and passed into the client; there is no
/// ambient or static engine connection. The timeout applies uniformly to
/// every request the client sends.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine base URL (e.g. "http://localhost:9200").
    pub url: String,
    /// Username for basic authentication. Credentials are only applied
    /// when both username and password are non-empty.
    pub username: String,
    /// Password for basic authentication.
    pub password: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            username: String::new(),
            password: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl EngineConfig {
    /// Create a config for the given URL with default timeouts and no
    /// authentication.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Whether basic-auth credentials should be applied.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}
