//! The authenticating request gateway.
//!
//! Every endpoint binding ends up in [`CisClient::call_with`], which:
//!
//! 1. refuses to run without credentials,
//! 2. resolves the [`AuthMode`] into a base URL and header set,
//! 3. refreshes the bearer token when it is missing or close to expiry,
//! 4. sends a GET with the parameters as the query string,
//! 5. decodes the JSON body and classifies non-200 responses.
//!
//! # Examples
//!
//! ```no_run
//! use cisapi_client::CisClient;
//! use cisapi_common::{ClientConfig, Credentials};
//!
//! # async fn example() -> Result<(), cisapi_client::ApiError> {
//! let mut client = CisClient::new(ClientConfig::new(), Credentials::new("key", "key-id"))?;
//!
//! let regions = client.get_regions().await?;
//! println!("{regions}");
//! # Ok(())
//! # }
//! ```
//!
//! # Sharing a token between workers
//!
//! ```no_run
//! use cisapi_client::CisClient;
//! use cisapi_common::{ClientConfig, Credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = CisClient::new(ClientConfig::new(), Credentials::new("key", "key-id"))?;
//! client.refresh_token().await?;
//!
//! // Hand this to another process...
//! let json = serde_json::to_string(&client.snapshot())?;
//!
//! // ...which picks up the same token without calling getToken again.
//! let mut worker = CisClient::from_snapshot(ClientConfig::new(), serde_json::from_str(&json)?)?;
//! let brands = worker.get_brands().await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, error, warn};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;

use cisapi_common::{
    AuthMode, BearerToken, ClientConfig, ClientSnapshot, Credentials, DEFAULT_CREDENTIALS_FILE,
    DEFAULT_STAGE, EndpointRequest, Params, TokenState,
};

use crate::credentials;
use crate::error::ApiError;
use crate::{add_proxy_headers, join_url};

/// Endpoint that exchanges an API key for a bearer token.
pub const TOKEN_ENDPOINT: &str = "getToken";

/// Query parameter carrying the bearer token.
pub const TOKEN_PARAM: &str = "jwt";

/// Where to find the quick start guide when the token exchange keeps failing.
const QUICK_START_URL: &str = "https://api.autodealerdata.com/APIQuickStart";

/// Successful response of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    token: String,
    expires: serde_json::Number,
}

impl TokenGrant {
    #[allow(clippy::cast_possible_truncation)]
    fn into_bearer(self) -> Option<BearerToken> {
        let expires_at = self
            .expires
            .as_i64()
            .or_else(|| self.expires.as_f64().map(|secs| secs.floor() as i64))?;
        Some(BearerToken::new(self.token, expires_at))
    }
}

/// Client for the CIS Automotive API.
///
/// Owns its credentials, token state and auth mode. All request methods take
/// `&mut self`: a client handles one call at a time, and a token refresh
/// triggered by a call finishes before the call itself is sent. Share a
/// client across tasks behind your own lock, or give each worker its own
/// client seeded from a [`ClientSnapshot`].
///
/// # Security
///
/// The API key and token are held as `secrecy` secrets and never appear in
/// `Debug` output or logs. Transport errors are stripped of their URL because
/// the token exchange carries the API key in the query string.
#[derive(Debug)]
pub struct CisClient {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: Option<Credentials>,
    token: TokenState,
    auth_mode: AuthMode,
}

/// Builder for [`CisClient`].
///
/// Explicit credentials win over a credentials file; the file is not even
/// read when both are given. With neither, `CIS_API_CREDS.txt` and the
/// `default` stage are tried.
#[derive(Debug, Default)]
pub struct CisClientBuilder {
    config: ClientConfig,
    credentials: Option<Credentials>,
    credentials_file: Option<(PathBuf, String)>,
    auth_mode: Option<AuthMode>,
}

impl CisClientBuilder {
    /// Sets the client configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses these credentials and skips file loading.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Loads credentials for `stage` from `path` unless explicit credentials are set.
    #[must_use]
    pub fn credentials_file(mut self, path: impl Into<PathBuf>, stage: impl Into<String>) -> Self {
        self.credentials_file = Some((path.into(), stage.into()));
        self
    }

    /// Overrides the auth mode from the configuration.
    #[must_use]
    pub const fn auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = Some(auth_mode);
        self
    }

    /// Builds the client.
    ///
    /// A credentials file without the requested stage is not fatal: the
    /// client is built without credentials and every call fails with
    /// [`ApiError::MissingCredentials`] until some are set.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidConfiguration`] if the configuration does not validate
    /// - [`ApiError::ConfigNotFound`] if the credentials file cannot be read
    pub fn build(self) -> Result<CisClient, ApiError> {
        let credentials = match self.credentials {
            Some(credentials) => Some(credentials),
            None => {
                let (path, stage) = self.credentials_file.unwrap_or_else(|| {
                    (
                        PathBuf::from(DEFAULT_CREDENTIALS_FILE),
                        DEFAULT_STAGE.to_string(),
                    )
                });
                match credentials::load(&path, &stage) {
                    Ok(credentials) => Some(credentials),
                    Err(err @ ApiError::ConfigStageMissing { .. }) => {
                        warn!("{err}; continuing without credentials");
                        None
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        let auth_mode = self.auth_mode.unwrap_or(self.config.auth_mode);
        CisClient::from_parts(self.config, credentials, TokenState::empty(), auth_mode)
    }
}

impl CisClient {
    /// Create a client with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfiguration`] if the configuration does
    /// not validate or the HTTP client cannot be built.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let auth_mode = config.auth_mode;
        Self::from_parts(config, Some(credentials), TokenState::empty(), auth_mode)
    }

    /// Start building a client.
    #[must_use]
    pub fn builder() -> CisClientBuilder {
        CisClientBuilder::default()
    }

    /// Create a client from a state exported by another client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfiguration`] if the configuration does
    /// not validate or the HTTP client cannot be built.
    pub fn from_snapshot(config: ClientConfig, snapshot: ClientSnapshot) -> Result<Self, ApiError> {
        Self::from_parts(
            config,
            snapshot.credentials,
            snapshot.token,
            snapshot.auth_mode,
        )
    }

    fn from_parts(
        config: ClientConfig,
        credentials: Option<Credentials>,
        token: TokenState,
        auth_mode: AuthMode,
    ) -> Result<Self, ApiError> {
        config
            .validate()
            .map_err(|e| ApiError::InvalidConfiguration(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| {
                ApiError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            config,
            credentials: credentials.filter(|c| !c.is_blank()),
            token,
            auth_mode,
        })
    }

    /// Get the client's configuration.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The current auth mode.
    pub const fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// Switch auth mode. Takes effect on the next call.
    pub fn set_auth_mode(&mut self, auth_mode: AuthMode) {
        debug!("Switching auth mode from {} to {auth_mode}", self.auth_mode);
        self.auth_mode = auth_mode;
    }

    /// The configured credentials, if any.
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Replace the credentials.
    ///
    /// A token obtained with a different key or ID is dropped. Setting the
    /// credentials already in use keeps the current token.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        let unchanged = self.credentials.as_ref().is_some_and(|current| {
            current.api_id() == credentials.api_id()
                && current.api_key().expose_secret() == credentials.api_key().expose_secret()
        });

        self.credentials = Some(credentials).filter(|c| !c.is_blank());
        if !unchanged {
            self.token.clear();
        }
    }

    /// Replace the credentials with the ones stored for `stage` in `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigNotFound`] or [`ApiError::ConfigStageMissing`];
    /// the current credentials are kept in both cases.
    pub fn load_credentials(&mut self, path: impl AsRef<Path>, stage: &str) -> Result<(), ApiError> {
        let credentials = credentials::load(path, stage)?;
        self.set_credentials(credentials);
        Ok(())
    }

    /// The current token state.
    pub const fn token_state(&self) -> &TokenState {
        &self.token
    }

    /// Install a token obtained elsewhere.
    pub fn set_token(&mut self, token: BearerToken) {
        self.token.replace(token);
    }

    /// Check if the token needs refreshing right now.
    ///
    /// `safety_factor` scales the configured minimum lifetime; pass `1.0`
    /// for the policy used before every call, or more for extra margin.
    pub fn is_token_stale(&self, safety_factor: f64) -> bool {
        self.token.is_stale(
            Utc::now().timestamp(),
            self.config.min_token_lifetime,
            safety_factor,
        )
    }

    /// Export credentials, token and auth mode.
    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            credentials: self.credentials.clone(),
            token: self.token.clone(),
            auth_mode: self.auth_mode,
        }
    }

    /// Replace credentials, token and auth mode with an exported state.
    pub fn restore(&mut self, snapshot: ClientSnapshot) {
        self.credentials = snapshot.credentials.filter(|c| !c.is_blank());
        self.token = snapshot.token;
        self.auth_mode = snapshot.auth_mode;
    }

    fn require_credentials(&self) -> Result<&Credentials, ApiError> {
        self.credentials.as_ref().ok_or(ApiError::MissingCredentials)
    }

    /// Exchange the API key for a new bearer token.
    ///
    /// Does nothing in a proxy mode, where no token is used. On failure the
    /// current token is left as it was.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingCredentials`] if no API key is configured
    /// - [`ApiError::AuthRefreshFailed`] wrapping the transport, HTTP or
    ///   decoding error of the exchange
    pub async fn refresh_token(&mut self) -> Result<(), ApiError> {
        if self.auth_mode.is_proxy() {
            debug!("Auth mode {} does not use bearer tokens", self.auth_mode);
            return Ok(());
        }

        let credentials = self.require_credentials()?;
        let params = Params::new()
            .with("apiID", credentials.api_id())
            .with("apiKey", credentials.api_key().expose_secret());

        let token = match self
            .execute(TOKEN_ENDPOINT, &params)
            .await
            .and_then(|body| parse_token(&body))
        {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    "Token refresh failed: {e}. Make sure the API keys are correct and the \
                     account is active. Quick start guide: {QUICK_START_URL}"
                );
                return Err(ApiError::AuthRefreshFailed(Box::new(e)));
            }
        };

        debug!("Obtained token expiring at {}", token.expires_at());
        self.token.replace(token);
        Ok(())
    }

    /// Call an endpoint with bearer authentication.
    ///
    /// Use this for endpoints that have no binding yet.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn call(&mut self, endpoint: &str, params: Params) -> Result<Value, ApiError> {
        self.call_with(endpoint, params, true).await
    }

    /// Send a prepared endpoint request with bearer authentication.
    ///
    /// # Errors
    ///
    /// See [`CisClient::call_with`].
    pub async fn send(&mut self, request: EndpointRequest) -> Result<Value, ApiError> {
        self.call_with(&request.name, request.params, true).await
    }

    /// Call an endpoint, optionally without bearer authentication.
    ///
    /// `include_bearer_auth` is ignored in proxy modes, which never use a
    /// token. The decoded JSON body is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingCredentials`] if no API key is configured (nothing is sent)
    /// - [`ApiError::AuthRefreshFailed`] if a needed token refresh failed (the call is not sent)
    /// - [`ApiError::AuthorizationConfig`] on HTTP 401/403
    /// - [`ApiError::Application`] on any other non-200 status
    /// - [`ApiError::Transport`] on network failure or timeout
    /// - [`ApiError::InvalidResponse`] if a 200 body is not JSON
    pub async fn call_with(
        &mut self,
        endpoint: &str,
        mut params: Params,
        include_bearer_auth: bool,
    ) -> Result<Value, ApiError> {
        self.require_credentials()?;

        if include_bearer_auth && self.auth_mode.uses_bearer_token() {
            if self.is_token_stale(1.0) {
                debug!("Token missing or close to expiry, refreshing before {endpoint}");
                self.refresh_token().await?;
            }

            let jwt = self.token.bearer().ok_or_else(|| ApiError::InvalidResponse {
                endpoint: TOKEN_ENDPOINT.to_string(),
                reason: "no token available after refresh".to_string(),
            })?;
            params.insert(TOKEN_PARAM, jwt);
        }

        self.execute(endpoint, &params).await
    }

    async fn execute(&self, endpoint: &str, params: &Params) -> Result<Value, ApiError> {
        let credentials = self.require_credentials()?;
        let url = join_url(self.config.base_url_for(self.auth_mode), endpoint);

        reqwest::Url::parse(&url)
            .map_err(|e| ApiError::InvalidConfiguration(format!("Invalid URL '{url}': {e}")))?;

        let mut request_builder = self.http.get(&url).query(&params.to_query());

        if let Some(proxy) = self.config.proxy_for(self.auth_mode) {
            request_builder = add_proxy_headers(request_builder, proxy, credentials.api_key());
        }

        debug!(
            "GET {url} via {} with {} parameter(s)",
            self.auth_mode,
            params.len()
        );

        // The query string may carry the API key or token
        let response = request_builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.without_url()))?;

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(e) if status == StatusCode::OK => {
                return Err(ApiError::InvalidResponse {
                    endpoint: endpoint.to_string(),
                    reason: format!("body is not JSON: {e}"),
                });
            }
            Err(e) => {
                debug!("Error body from {endpoint} is not JSON ({e}), keeping raw text");
                Value::String(text)
            }
        };

        if status != StatusCode::OK {
            error!(
                "Request to {endpoint} failed with status {}: {body}",
                status.as_u16()
            );
            return Err(classify_failure(endpoint, status, body));
        }

        Ok(body)
    }
}

/// Map a non-200 response to an error.
fn classify_failure(endpoint: &str, status: StatusCode, body: Value) -> ApiError {
    let endpoint = endpoint.to_string();
    let status = status.as_u16();
    match status {
        401 | 403 => ApiError::AuthorizationConfig {
            endpoint,
            status,
            body,
        },
        _ => ApiError::Application {
            endpoint,
            status,
            body,
        },
    }
}

fn parse_token(body: &Value) -> Result<BearerToken, ApiError> {
    let invalid = |reason: String| ApiError::InvalidResponse {
        endpoint: TOKEN_ENDPOINT.to_string(),
        reason,
    };

    TokenGrant::deserialize(body)
        .map_err(|e| invalid(format!("unexpected token response: {e}")))?
        .into_bearer()
        .ok_or_else(|| invalid("token expiry is not a number of seconds".to_string()))
}
