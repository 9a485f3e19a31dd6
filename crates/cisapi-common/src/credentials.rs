use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// Stage used when none is named.
pub const DEFAULT_STAGE: &str = "default";

/// File name the client looks for when no credential source is given.
pub const DEFAULT_CREDENTIALS_FILE: &str = "CIS_API_CREDS.txt";

/// API credentials for one stage.
///
/// The API key is stored using the `secrecy` crate so that it never shows up
/// in `Debug` output or logs. `api_id` is not secret on its own but is only
/// useful together with the key.
///
/// # Examples
///
/// ```
/// use cisapi_common::Credentials;
///
/// let credentials = Credentials::new("my-key", "my-id");
/// assert_eq!(credentials.api_id(), "my-id");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(serialize_with = "serialize_secret")]
    api_key: SecretString,
    api_id: String,
}

impl Credentials {
    /// Creates credentials from a raw API key and its key ID.
    pub fn new(api_key: impl Into<String>, api_id: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into().into()),
            api_id: api_id.into(),
        }
    }

    /// The API key. Call `expose_secret()` to read it.
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// The API key ID.
    #[must_use]
    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    /// Returns `true` when the API key is empty.
    ///
    /// An empty key is treated the same as having no credentials at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.api_key.expose_secret().is_empty()
    }
}

// Custom Debug implementation to avoid exposing the API key
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_id", &self.api_id)
            .finish()
    }
}

/// Writes a secret in clear text.
///
/// Only used for state that is meant to be handed to another process.
pub(crate) fn serialize_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
