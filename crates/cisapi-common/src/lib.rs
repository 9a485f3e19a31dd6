//! # cisapi-common
//!
//! Common types for the CIS Automotive API client.
//!
//! This crate holds the plain data the client is built from:
//! - Credentials and the bearer-token state with its freshness check
//! - The auth mode selector and proxy profiles
//! - Client configuration
//! - Query parameters and endpoint requests
//! - Snapshots for sharing client state between worker processes
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use cisapi_common::{BearerToken, ClientConfig, Params, TokenState};
//!
//! let config = ClientConfig::new();
//! let state = TokenState::with_token(BearerToken::new("T", 10_000));
//!
//! // With 360 s minimum lifetime the token is still fresh at t = 9_000
//! assert!(!state.is_stale(9_000, config.min_token_lifetime, 1.0));
//!
//! let params = Params::new().with("brandName", "FORD");
//! assert_eq!(params.len(), 1);
//! ```

/// Auth mode selection and proxy profiles.
pub mod auth;
/// Client configuration.
pub mod config;
/// API credentials.
pub mod credentials;
/// Query parameters and endpoint requests.
pub mod params;
/// Exportable client state.
pub mod snapshot;
/// Bearer token state and freshness policy.
pub mod token;

pub use auth::{AuthMode, ConflictingAuthModes, ProxyProfile};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, PROXY_PROFILE_B_HOST};
pub use credentials::{Credentials, DEFAULT_CREDENTIALS_FILE, DEFAULT_STAGE};
pub use params::{EndpointRequest, ParamValue, Params};
pub use snapshot::ClientSnapshot;
pub use token::{BearerToken, MIN_TOKEN_LIFETIME, TokenState};
