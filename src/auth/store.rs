//! Token cache persistence (`tokens.json`).
//!
//! The cache holds the full token payload exactly as the token endpoint
//! returned it. It is written once per process lifetime, after a successful
//! interactive exchange, and read back on the next start. There is no file
//! locking; concurrent processes are out of scope for a single-user tool.

use std::path::{Path, PathBuf};

use oauth2::basic::BasicTokenResponse;
use tracing::{debug, warn};

use super::error::AuthError;

/// Default token cache location, relative to the working directory.
pub const DEFAULT_TOKEN_PATH: &str = "tokens.json";

/// On-disk cache for the OAuth token payload.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached token payload, if one is present and parseable.
    ///
    /// A missing or corrupt file is not an error: it means the interactive
    /// flow has to run, so both cases collapse to `None`. A corrupt file is
    /// logged so the user can see why a browser window appeared.
    #[must_use]
    pub fn load(&self) -> Option<BasicTokenResponse> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "no usable token cache");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(token) => {
                debug!(path = %self.path.display(), "loaded cached token");
                Some(token)
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    %err,
                    "token cache is corrupt, falling back to interactive auth"
                );
                None
            }
        }
    }

    /// Persists the full token payload.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StoreIo` if serialization or the write fails.
    pub fn save(&self, token: &BasicTokenResponse) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(token).map_err(|source| AuthError::StoreIo {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
        })?;
        std::fs::write(&self.path, json).map_err(|source| AuthError::StoreIo {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "token cache written");
        Ok(())
    }
}
