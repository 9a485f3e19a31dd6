use serde::{Deserialize, Serialize};

use crate::auth::AuthMode;
use crate::credentials::Credentials;
use crate::token::TokenState;

/// Everything a client knows that is not configuration.
///
/// Export it from one client and import it into another (typically in a
/// different worker process) so that the second client reuses the token the
/// first one already fetched. Secrets are serialized in clear text: store the
/// snapshot somewhere only trusted workers can read.
///
/// Nothing coordinates two workers that decide to refresh at the same time;
/// each simply ends up with its own valid token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSnapshot {
    /// Credentials, if any were configured.
    pub credentials: Option<Credentials>,
    /// Current bearer token state.
    #[serde(default)]
    pub token: TokenState,
    /// Selected auth mode.
    #[serde(default)]
    pub auth_mode: AuthMode,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::token::BearerToken;

    #[test]
    fn json_roundtrip() {
        let snapshot = ClientSnapshot {
            credentials: Some(Credentials::new("K", "I")),
            token: TokenState::with_token(BearerToken::new("T", 1_700_000_000)),
            auth_mode: AuthMode::ProxyProfileB,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ClientSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back.credentials.unwrap().api_id(), "I");
        assert_eq!(back.token.bearer(), Some("T"));
        assert_eq!(back.token.expires_at(), Some(1_700_000_000));
        assert_eq!(back.auth_mode, AuthMode::ProxyProfileB);
    }

    #[test]
    fn missing_fields_default() {
        let back: ClientSnapshot = serde_json::from_str(r#"{"credentials":null}"#).unwrap();
        assert!(back.credentials.is_none());
        assert!(back.token.token().is_none());
        assert_eq!(back.auth_mode, AuthMode::Direct);
    }
}
