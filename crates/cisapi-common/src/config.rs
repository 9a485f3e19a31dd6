use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{AuthMode, ProxyProfile};
use crate::token::MIN_TOKEN_LIFETIME;

/// Base URL of the CIS Automotive API.
pub const DEFAULT_BASE_URL: &str = "https://api.autodealerdata.com";

/// Host of the second proxy profile.
pub const PROXY_PROFILE_B_HOST: &str = "cis-automotive-data.p.rapidapi.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 180;

/// Client configuration.
///
/// Holds everything about *where* and *how* requests are sent. Credentials
/// are kept separately because they can be loaded from a file, replaced at
/// runtime, and shared through snapshots.
///
/// # Examples
///
/// ```
/// use cisapi_common::{AuthMode, ClientConfig};
///
/// let config = ClientConfig::new()
///     .with_auth_mode(AuthMode::ProxyProfileA)
///     .with_timeout(30);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for direct API access.
    pub base_url: String,
    /// First proxy profile.
    pub proxy_a: ProxyProfile,
    /// Second proxy profile.
    pub proxy_b: ProxyProfile,
    /// Mode the client starts in.
    pub auth_mode: AuthMode,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Remaining token validity below which the token is refreshed.
    pub min_token_lifetime: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy_a: ProxyProfile::default(),
            proxy_b: ProxyProfile::rapidapi(PROXY_PROFILE_B_HOST),
            auth_mode: AuthMode::Direct,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            min_token_lifetime: MIN_TOKEN_LIFETIME,
            user_agent: concat!("cisapi-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with the default hosts and timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for direct access.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the first proxy profile.
    #[must_use]
    pub fn with_proxy_a(mut self, profile: ProxyProfile) -> Self {
        self.proxy_a = profile;
        self
    }

    /// Replaces the second proxy profile.
    #[must_use]
    pub fn with_proxy_b(mut self, profile: ProxyProfile) -> Self {
        self.proxy_b = profile;
        self
    }

    /// Sets the starting auth mode.
    #[must_use]
    pub const fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// Sets the request timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_seconds` - Timeout in seconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Sets the minimum remaining token lifetime.
    #[must_use]
    pub const fn with_min_token_lifetime(mut self, min_token_lifetime: Duration) -> Self {
        self.min_token_lifetime = min_token_lifetime;
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Base URL requests are sent to in `mode`.
    #[must_use]
    pub fn base_url_for(&self, mode: AuthMode) -> &str {
        match mode {
            AuthMode::Direct => &self.base_url,
            AuthMode::ProxyProfileA => &self.proxy_a.base_url,
            AuthMode::ProxyProfileB => &self.proxy_b.base_url,
        }
    }

    /// Proxy headers to attach in `mode`, if any.
    #[must_use]
    pub const fn proxy_for(&self, mode: AuthMode) -> Option<&ProxyProfile> {
        match mode {
            AuthMode::Direct => None,
            AuthMode::ProxyProfileA => Some(&self.proxy_a),
            AuthMode::ProxyProfileB => Some(&self.proxy_b),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found:
    /// - a base URL that does not parse or is not http(s)
    /// - a zero timeout
    /// - an empty proxy header name
    pub fn validate(&self) -> anyhow::Result<()> {
        for base_url in [&self.base_url, &self.proxy_a.base_url, &self.proxy_b.base_url] {
            let parsed = url::Url::parse(base_url)
                .map_err(|e| anyhow::anyhow!("invalid base URL '{base_url}': {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("base URL '{base_url}' must use http or https");
            }
        }

        if self.timeout_seconds == 0 {
            anyhow::bail!("timeout must be greater than zero");
        }

        for profile in [&self.proxy_a, &self.proxy_b] {
            if profile.host_header.is_empty() || profile.key_header.is_empty() {
                anyhow::bail!(
                    "proxy profile for '{}' is missing a header name",
                    profile.host
                );
            }
        }

        Ok(())
    }
}
