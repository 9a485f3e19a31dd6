use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when more than one proxy profile is switched on at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("only one proxy profile can be enabled at a time")]
pub struct ConflictingAuthModes;

/// How requests are authenticated and which host they go to.
///
/// `Direct` talks to the CIS API itself and uses the bearer-token exchange.
/// The proxy modes route through an API marketplace host and authenticate
/// with the raw API key in a fixed header; no token is ever requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Direct API access with a short-lived bearer token.
    #[default]
    Direct,
    /// First proxy profile (RapidAPI by default).
    ProxyProfileA,
    /// Second proxy profile.
    ProxyProfileB,
}

impl AuthMode {
    /// Builds a mode from the two legacy "use proxy" switches.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictingAuthModes`] when both switches are on.
    ///
    /// # Examples
    ///
    /// ```
    /// use cisapi_common::AuthMode;
    ///
    /// assert_eq!(AuthMode::from_flags(false, false), Ok(AuthMode::Direct));
    /// assert_eq!(AuthMode::from_flags(true, false), Ok(AuthMode::ProxyProfileA));
    /// assert!(AuthMode::from_flags(true, true).is_err());
    /// ```
    pub const fn from_flags(proxy_a: bool, proxy_b: bool) -> Result<Self, ConflictingAuthModes> {
        match (proxy_a, proxy_b) {
            (false, false) => Ok(Self::Direct),
            (true, false) => Ok(Self::ProxyProfileA),
            (false, true) => Ok(Self::ProxyProfileB),
            (true, true) => Err(ConflictingAuthModes),
        }
    }

    /// Whether requests in this mode carry a bearer token.
    #[must_use]
    pub const fn uses_bearer_token(self) -> bool {
        matches!(self, Self::Direct)
    }

    /// Whether this is one of the proxy modes.
    #[must_use]
    pub const fn is_proxy(self) -> bool {
        !self.uses_bearer_token()
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::ProxyProfileA => write!(f, "proxy_profile_a"),
            Self::ProxyProfileB => write!(f, "proxy_profile_b"),
        }
    }
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "proxy_profile_a" | "proxy-a" => Ok(Self::ProxyProfileA),
            "proxy_profile_b" | "proxy-b" => Ok(Self::ProxyProfileB),
            _ => Err(format!("unknown auth mode: {s}")),
        }
    }
}

/// Host and header layout of an API marketplace proxy.
///
/// Requests routed through a proxy carry two extra headers:
/// `host_header: host` and `key_header: <API key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyProfile {
    /// Base URL requests are sent to.
    pub base_url: String,
    /// Name of the header identifying the proxied API.
    pub host_header: String,
    /// Value of `host_header`.
    pub host: String,
    /// Name of the header that carries the API key.
    pub key_header: String,
}

impl ProxyProfile {
    /// Creates a profile that uses RapidAPI's header names for `host`.
    pub fn rapidapi(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            base_url: format!("https://{host}"),
            host_header: "x-rapidapi-host".to_string(),
            host,
            key_header: "x-rapidapi-key".to_string(),
        }
    }

    /// Sets the base URL, keeping the header layout.
    ///
    /// Useful for pointing a profile at a local stub.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for ProxyProfile {
    fn default() -> Self {
        Self::rapidapi("cis-automotive.p.rapidapi.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_direct_uses_bearer() {
        assert!(AuthMode::Direct.uses_bearer_token());
        assert!(!AuthMode::ProxyProfileA.uses_bearer_token());
        assert!(!AuthMode::ProxyProfileB.uses_bearer_token());
        assert!(AuthMode::ProxyProfileB.is_proxy());
    }

    #[test]
    fn flags_map_to_modes() {
        assert_eq!(AuthMode::from_flags(false, true), Ok(AuthMode::ProxyProfileB));
        assert_eq!(AuthMode::from_flags(true, true), Err(ConflictingAuthModes));
    }

    #[test]
    fn display_parses_back() {
        for mode in [
            AuthMode::Direct,
            AuthMode::ProxyProfileA,
            AuthMode::ProxyProfileB,
        ] {
            assert_eq!(mode.to_string().parse::<AuthMode>(), Ok(mode));
        }
        assert!("both".parse::<AuthMode>().is_err());
    }

    #[test]
    fn default_profile_is_rapidapi() {
        let profile = ProxyProfile::default();
        assert_eq!(profile.base_url, "https://cis-automotive.p.rapidapi.com");
        assert_eq!(profile.host_header, "x-rapidapi-host");
        assert_eq!(profile.host, "cis-automotive.p.rapidapi.com");
        assert_eq!(profile.key_header, "x-rapidapi-key");
    }
}
