//! Error types for the listing module.

use thiserror::Error;

use crate::auth::AuthError;

/// Errors that can occur while listing media items.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Network-level failure reaching the listing endpoint.
    #[error("network error listing media items: {source}")]
    Transport {
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The listing endpoint returned a non-success status.
    #[error("HTTP {status} from listing endpoint")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body did not match the declared page schema.
    ///
    /// The body is decoded and validated once at this boundary so a shape
    /// mismatch fails here instead of surfacing as a missing field deep in
    /// the consumer.
    #[error("malformed listing response: {source}")]
    Parse {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The credential could not be refreshed before the request.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl LibraryError {
    /// Creates a transport error from a reqwest error.
    pub fn transport(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }

    /// Creates a status error.
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Creates a parse error.
    pub fn parse(source: serde_json::Error) -> Self {
        Self::Parse { source }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_library_error_status_display() {
        let msg = LibraryError::status(503).to_string();
        assert!(msg.contains("503"), "Expected status in: {msg}");
    }

    #[test]
    fn test_library_error_parse_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let msg = LibraryError::parse(source).to_string();
        assert!(msg.contains("malformed"), "Expected 'malformed' in: {msg}");
    }
}
