//! Expiry-aware wrapper over the raw OAuth token payload.

use std::time::{Duration, SystemTime};

use oauth2::basic::BasicTokenResponse;
use oauth2::{RefreshToken, TokenResponse};

/// Safety buffer subtracted from the advertised token lifetime so a request
/// never races the actual expiry.
const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

/// Conservative lifetime assumed when the token endpoint omits `expires_in`
/// (one hour minus the buffer).
const FALLBACK_LIFETIME: Duration = Duration::from_secs(3300);

/// A bearer token plus the moment it should be considered stale.
///
/// The payload is mutated only by [`Credential::replace`], which the flow
/// calls after a refresh exchange; the refresh token is preserved when the
/// server's refresh response omits one.
#[derive(Debug, Clone)]
pub struct Credential {
    token: BasicTokenResponse,
    expires_at: SystemTime,
}

impl Credential {
    /// Wraps a token freshly returned by the token endpoint, computing
    /// expiry from its `expires_in` field.
    #[must_use]
    pub fn fresh(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: expiry_of(&token),
            token,
        }
    }

    /// Wraps a token loaded from the on-disk cache.
    ///
    /// Cached tokens are marked already expired: their true remaining
    /// lifetime is unknown, so the first API call refreshes silently.
    #[must_use]
    pub fn cached(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: SystemTime::UNIX_EPOCH,
            token,
        }
    }

    /// The current access token secret.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.token.access_token().secret()
    }

    /// The refresh token, when one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.token.refresh_token()
    }

    /// Whether the access token is past its buffered expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }

    /// Installs a refreshed token payload, preserving the previous refresh
    /// token if the new payload lacks one.
    pub fn replace(&mut self, new_token: BasicTokenResponse) {
        let old_token = std::mem::replace(&mut self.token, new_token);
        if self.token.refresh_token().is_none() {
            self.token
                .set_refresh_token(old_token.refresh_token().cloned());
        }
        self.expires_at = expiry_of(&self.token);
    }

    /// The raw payload, for persistence.
    #[must_use]
    pub fn raw(&self) -> &BasicTokenResponse {
        &self.token
    }
}

fn expiry_of(token: &BasicTokenResponse) -> SystemTime {
    let now = SystemTime::now();
    match token.expires_in() {
        Some(expires_in) if expires_in > EXPIRY_BUFFER => now + expires_in - EXPIRY_BUFFER,
        Some(_) => now,
        None => now + FALLBACK_LIFETIME,
    }
}
