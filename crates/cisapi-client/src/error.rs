//! Error types for the client library.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use cisapi_common::ConflictingAuthModes;

/// Errors that can occur when calling the CIS Automotive API.
///
/// Variants fall into two groups. Credential and configuration problems are
/// reported before anything is sent; everything else happened on or after
/// the wire. [`ApiError::is_pre_request`] tells them apart.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No API key is configured.
    ///
    /// Either set up a credentials file or pass credentials explicitly.
    #[error("no API credentials were provided; set up a credentials file or pass them explicitly")]
    MissingCredentials,

    /// The credentials file does not exist or cannot be read.
    #[error("cannot read credentials file {}: {reason}", path.display())]
    ConfigNotFound {
        /// Path that was tried.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The credentials file has no usable section for the stage.
    #[error("stage '{stage}' not found in credentials file {}", path.display())]
    ConfigStageMissing {
        /// Path of the credentials file.
        path: PathBuf,
        /// Stage that was looked up.
        stage: String,
    },

    /// The credentials file could not be written.
    #[error("cannot write credentials file {}: {source}", path.display())]
    ConfigWrite {
        /// Path that was written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Client configuration issue.
    ///
    /// Invalid base URL, conflicting auth modes, or an HTTP client that
    /// could not be built.
    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    /// The token exchange failed and the original call was not attempted.
    #[error("token refresh failed: {0}")]
    AuthRefreshFailed(#[source] Box<ApiError>),

    /// HTTP 401 or 403.
    ///
    /// The selected auth mode does not match the credentials, or the
    /// subscription does not include this resource.
    #[error("authorization failed calling {endpoint} (HTTP {status}): {body}")]
    AuthorizationConfig {
        /// Endpoint that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Decoded error body returned by the API.
        body: Value,
    },

    /// Any other non-200 response.
    #[error("API error calling {endpoint} (HTTP {status}): {body}")]
    Application {
        /// Endpoint that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Decoded error body returned by the API.
        body: Value,
    },

    /// Network or HTTP request failure, including timeouts.
    ///
    /// The wrapped error has its URL removed: the token exchange sends the
    /// API key in the query string, and other calls send the bearer token
    /// there. Kind, timeout flag and source are kept.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response that could not be used.
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Endpoint that was called.
        endpoint: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<ConflictingAuthModes> for ApiError {
    fn from(err: ConflictingAuthModes) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}

impl ApiError {
    /// Check if the call was abandoned before any request was sent.
    pub const fn is_pre_request(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials
                | Self::ConfigNotFound { .. }
                | Self::ConfigStageMissing { .. }
                | Self::ConfigWrite { .. }
                | Self::InvalidConfiguration(_)
        )
    }

    /// Check if this is a 401/403 from the API.
    pub const fn is_authorization_error(&self) -> bool {
        matches!(self, Self::AuthorizationConfig { .. })
    }

    /// Check if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::AuthRefreshFailed(inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of an error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthorizationConfig { status, .. } | Self::Application { status, .. } => {
                Some(*status)
            }
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::AuthRefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// Decoded body of an error response.
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::AuthorizationConfig { body, .. } | Self::Application { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Endpoint the failing call was made to.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::AuthorizationConfig { endpoint, .. }
            | Self::Application { endpoint, .. }
            | Self::InvalidResponse { endpoint, .. } => Some(endpoint),
            Self::AuthRefreshFailed(inner) => inner.endpoint(),
            _ => None,
        }
    }
}
