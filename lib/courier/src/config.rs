//! Service configuration types.

use std::collections::HashMap;
use std::time::Duration;

/// Configuration of a remote service.
///
/// Built once when the client is set up and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL prepended to every relative path.
    pub base_url: String,
    /// Base URL of the upload server.
    pub upload_base_url: String,
    /// Headers added to a request unless it already sets them.
    pub default_headers: HashMap<String, String>,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Timeout for receiving the complete response.
    pub read_timeout: Duration,
    /// Retry budget. Carried for callers; requests are never retried.
    pub max_retries: u32,
    /// Whether request/response lines are logged.
    pub logging_enabled: bool,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            upload_base_url: String::new(),
            default_headers: HashMap::new(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            max_retries: 0,
            logging_enabled: false,
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl ServiceConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Base URL of the upload server, for [`RemoteRequest::base_url`](courier_core::RemoteRequest::base_url).
    #[must_use]
    pub fn upload_base_url(&self) -> &str {
        &self.upload_base_url
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    base_url: Option<String>,
    upload_base_url: Option<String>,
    default_headers: HashMap<String, String>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    max_retries: Option<u32>,
    logging_enabled: Option<bool>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl ServiceConfigBuilder {
    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the upload server base URL.
    #[must_use]
    pub fn upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.upload_base_url = Some(url.into());
        self
    }

    /// Add a default header.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry budget.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Enable or disable request logging.
    #[must_use]
    pub const fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = Some(enabled);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            upload_base_url: self.upload_base_url.unwrap_or(defaults.upload_base_url),
            default_headers: self.default_headers,
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            read_timeout: self.read_timeout.unwrap_or(defaults.read_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            logging_enabled: self.logging_enabled.unwrap_or(defaults.logging_enabled),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}
