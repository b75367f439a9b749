//! Error types for the auth module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while acquiring or refreshing a credential.
///
/// Listener failures and token-exchange failures both surface through this
/// one type: callers only ever see a single result channel per acquisition
/// and distinguish causes by variant, not by structure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The client secrets file could not be read.
    #[error("cannot read client secrets at {path}: {source}")]
    SecretsIo {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The client secrets file is not valid Google console JSON.
    #[error("malformed client secrets at {path}: {source}")]
    SecretsParse {
        /// Path that failed to parse.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The secrets file carries neither a `web` nor an `installed` section,
    /// or lists no redirect URI.
    #[error("client secrets at {path} are incomplete: {detail}")]
    SecretsIncomplete {
        /// Path to the offending file.
        path: PathBuf,
        /// Which part was missing.
        detail: &'static str,
    },

    /// An endpoint or redirect URI in the secrets file is not a valid URL.
    #[error("invalid URL in client secrets: {url}")]
    InvalidEndpoint {
        /// The URL that failed to parse.
        url: String,
    },

    /// Writing the token cache failed.
    #[error("cannot write token cache at {path}: {source}")]
    StoreIo {
        /// The token cache path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client used for token-endpoint calls failed to build.
    #[error("cannot build token-endpoint HTTP client: {source}")]
    HttpClient {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The loopback listener could not bind or accept.
    #[error("callback listener error on port {port}: {source}")]
    Listener {
        /// The port the listener was using.
        port: u16,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The browser redirect hit the callback route without a `code`
    /// parameter, or carried an explicit `error` (consent denied).
    #[error("authorization callback failed: {reason}")]
    CallbackRejected {
        /// The `error` query value, or a description of what was missing.
        reason: String,
    },

    /// The token endpoint rejected the authorization-code exchange.
    #[error("token exchange failed: {source}")]
    Exchange {
        /// The underlying oauth2 request error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A refresh was required but the credential carries no refresh token.
    #[error("credential is expired and has no refresh token; delete the token cache and re-authenticate")]
    NoRefreshToken,

    /// The token endpoint rejected a refresh-token exchange.
    #[error("token refresh failed: {source}")]
    Refresh {
        /// The underlying oauth2 request error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AuthError {
    /// Creates a listener error.
    pub fn listener(port: u16, source: std::io::Error) -> Self {
        Self::Listener { port, source }
    }

    /// Creates a callback-rejected error.
    pub fn callback_rejected(reason: impl Into<String>) -> Self {
        Self::CallbackRejected {
            reason: reason.into(),
        }
    }

    /// Creates an exchange error from any oauth2 request error.
    pub fn exchange(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Exchange {
            source: Box::new(source),
        }
    }

    /// Creates a refresh error from any oauth2 request error.
    pub fn refresh(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Refresh {
            source: Box::new(source),
        }
    }
}
