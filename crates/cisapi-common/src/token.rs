use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::credentials::serialize_secret;

/// Minimum remaining validity a token must have before a new call is started.
pub const MIN_TOKEN_LIFETIME: Duration = Duration::from_secs(360);

/// A bearer token obtained from the token endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct BearerToken {
    #[serde(serialize_with = "serialize_secret")]
    value: SecretString,
    /// Absolute expiry, in seconds since the Unix epoch.
    expires_at: i64,
}

impl BearerToken {
    /// Creates a token that expires at `expires_at` (epoch seconds).
    pub fn new(value: impl Into<String>, expires_at: i64) -> Self {
        Self {
            value: SecretString::new(value.into().into()),
            expires_at,
        }
    }

    /// The raw token value.
    #[must_use]
    pub const fn value(&self) -> &SecretString {
        &self.value
    }

    /// Expiry in epoch seconds.
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The client's current bearer token, if any.
///
/// A state without a token has no meaningful expiry and is always stale.
/// Only a successful token exchange (or an explicit import) replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenState {
    token: Option<BearerToken>,
}

impl TokenState {
    /// A state in which no token has been obtained yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self { token: None }
    }

    /// A state holding `token`.
    #[must_use]
    pub const fn with_token(token: BearerToken) -> Self {
        Self { token: Some(token) }
    }

    /// The current token, if one has been obtained.
    #[must_use]
    pub const fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// Expiry of the current token in epoch seconds.
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.token.as_ref().map(BearerToken::expires_at)
    }

    /// Returns the token value to attach to a request.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.value.expose_secret())
    }

    /// Replaces the current token.
    pub fn replace(&mut self, token: BearerToken) {
        self.token = Some(token);
    }

    /// Forgets the current token so that the next call refreshes.
    pub fn clear(&mut self) {
        self.token = None;
    }

    /// Checks whether the token must be refreshed before a call at `now`.
    ///
    /// Stale when no token has been obtained, or when the remaining lifetime
    /// `expires_at - now` is at or below `min_lifetime * safety_factor`.
    /// A `safety_factor` above 1.0 demands extra margin.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use cisapi_common::{BearerToken, TokenState};
    ///
    /// let state = TokenState::with_token(BearerToken::new("T", 1_000));
    /// let min = Duration::from_secs(360);
    ///
    /// assert!(!state.is_stale(0, min, 1.0));
    /// assert!(state.is_stale(640, min, 1.0));
    /// assert!(TokenState::empty().is_stale(0, min, 1.0));
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_stale(&self, now: i64, min_lifetime: Duration, safety_factor: f64) -> bool {
        let Some(token) = &self.token else {
            return true;
        };

        let remaining = token.expires_at.saturating_sub(now) as f64;
        remaining <= min_lifetime.as_secs_f64() * safety_factor
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use proptest::prelude::*;

    const MIN: Duration = MIN_TOKEN_LIFETIME;

    #[test]
    fn boundary_is_stale() {
        let state = TokenState::with_token(BearerToken::new("T", 1_360));
        assert!(state.is_stale(1_000, MIN, 1.0));
        assert!(!state.is_stale(999, MIN, 1.0));
    }

    #[test]
    fn safety_factor_widens_margin() {
        let state = TokenState::with_token(BearerToken::new("T", 1_500));
        assert!(!state.is_stale(1_000, MIN, 1.0));
        assert!(state.is_stale(1_000, MIN, 2.0));
    }

    #[test]
    fn expired_token_is_stale() {
        let state = TokenState::with_token(BearerToken::new("T", 10));
        assert!(state.is_stale(20, MIN, 1.0));
    }

    #[test]
    fn clear_makes_stale() {
        let mut state = TokenState::with_token(BearerToken::new("T", i64::MAX));
        assert!(!state.is_stale(0, MIN, 1.0));
        state.clear();
        assert!(state.is_stale(0, MIN, 1.0));
        assert_eq!(state.bearer(), None);
        assert_eq!(state.expires_at(), None);
    }

    #[test]
    fn token_debug_is_redacted() {
        let rendered = format!("{:?}", BearerToken::new("jwt-value", 5));
        assert!(!rendered.contains("jwt-value"));
    }

    #[test]
    fn serde_roundtrip_keeps_token() {
        let state = TokenState::with_token(BearerToken::new("T", 42));
        let json = serde_json::to_string(&state).unwrap();
        let back: TokenState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bearer(), Some("T"));
        assert_eq!(back.expires_at(), Some(42));
    }

    proptest! {
        #[test]
        fn empty_state_always_stale(now in any::<i64>(), factor in 0.0f64..10.0) {
            prop_assert!(TokenState::empty().is_stale(now, MIN, factor));
        }

        #[test]
        fn stale_iff_remaining_within_margin(
            now in 0i64..10_000_000,
            remaining in -1_000i64..10_000,
            min_secs in 0u64..5_000,
        ) {
            let state = TokenState::with_token(BearerToken::new("T", now + remaining));
            let min = Duration::from_secs(min_secs);
            let expected = remaining <= i64::try_from(min_secs).unwrap();
            prop_assert_eq!(state.is_stale(now, min, 1.0), expected);
        }
    }
}
