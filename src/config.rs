//! Configuration for board extraction.
//!
//! The endpoint URL and the API credential have no defaults; both come from
//! the caller. HTTP tuning (timeout, user agent) defaults to sensible values
//! and can be overridden through [`ConfigBuilder`].

use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent header value.
const DEFAULT_USER_AGENT: &str = concat!("boarddown/", env!("CARGO_PKG_VERSION"));

/// Complete configuration for a [`crate::BoardDown`] instance.
///
/// # Examples
///
/// ```rust
/// use boarddown::config::Config;
///
/// let config = Config::builder()
///     .api_url("https://api.monday.com/v2")
///     .api_token("secret")
///     .timeout_seconds(60)
///     .build();
///
/// assert_eq!(config.http.timeout.as_secs(), 60);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint URL. Caller-supplied; there is no default.
    pub api_url: String,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Credential settings.
    pub auth: AuthConfig,
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Credential settings.
///
/// The token is sent as the raw `Authorization` header value, exactly as
/// given. The API expects the bare token; no `Bearer ` prefix is added.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// API token. Caller-supplied; there is no default.
    pub api_token: String,
}

impl Config {
    /// Creates a configuration with the given endpoint and credential and
    /// default HTTP settings.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            http: HttpConfig::default(),
            auth: AuthConfig {
                api_token: api_token.into(),
            },
        }
    }

    /// Starts building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
///
/// Building never fails; an endpoint left unset is caught when the first
/// request validates the URL.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    api_url: String,
    api_token: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ConfigBuilder {
    /// Sets the GraphQL endpoint URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the API token, sent raw in the `Authorization` header.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Sets the User-Agent header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Finalizes the configuration.
    pub fn build(self) -> Config {
        let mut http = HttpConfig::default();
        if let Some(timeout) = self.timeout {
            http.timeout = timeout;
        }
        if let Some(user_agent) = self.user_agent {
            http.user_agent = user_agent;
        }
        Config {
            api_url: self.api_url,
            http,
            auth: AuthConfig {
                api_token: self.api_token,
            },
        }
    }
}
