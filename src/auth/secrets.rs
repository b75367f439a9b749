//! Client secrets loading (`credentials.json`).
//!
//! Google's developer console exports OAuth client configuration as a JSON
//! file with either a `web` or an `installed` top-level section. This module
//! reads that file once at startup and exposes the handful of fields the
//! flow needs: client id/secret, the loopback redirect URI, and the
//! authorization/token endpoints.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use super::error::AuthError;

/// Default Google authorization endpoint, used when the secrets file omits
/// `auth_uri`.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Default Google token endpoint, used when the secrets file omits
/// `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Loopback port assumed when the redirect URI does not name one.
pub const DEFAULT_CALLBACK_PORT: u16 = 8888;

/// Callback route assumed when the redirect URI has no path.
pub const DEFAULT_CALLBACK_PATH: &str = "/sso";

#[derive(Debug, Deserialize)]
struct SecretsFile {
    web: Option<SecretsSection>,
    installed: Option<SecretsSection>,
}

#[derive(Debug, Deserialize)]
struct SecretsSection {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

/// Parsed OAuth client configuration.
#[derive(Debug, Clone)]
pub struct ClientSecrets {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// The redirect URI registered for the loopback flow (first entry in
    /// the file).
    pub redirect_uri: String,
    /// Authorization endpoint.
    pub auth_uri: String,
    /// Token endpoint.
    pub token_uri: String,
}

impl ClientSecrets {
    /// Reads and parses a `credentials.json` file.
    ///
    /// Accepts both `web` and `installed` sections, preferring `web` when
    /// both are present.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the file cannot be read, is not valid JSON,
    /// carries neither section, or lists no redirect URI.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|source| AuthError::SecretsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SecretsFile =
            serde_json::from_str(&raw).map_err(|source| AuthError::SecretsParse {
                path: path.to_path_buf(),
                source,
            })?;

        let section = file
            .web
            .or(file.installed)
            .ok_or_else(|| AuthError::SecretsIncomplete {
                path: path.to_path_buf(),
                detail: "no `web` or `installed` section",
            })?;

        let redirect_uri = section
            .redirect_uris
            .first()
            .cloned()
            .ok_or_else(|| AuthError::SecretsIncomplete {
                path: path.to_path_buf(),
                detail: "empty `redirect_uris`",
            })?;

        Ok(Self {
            client_id: section.client_id,
            client_secret: section.client_secret,
            redirect_uri,
            auth_uri: section
                .auth_uri
                .unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: section
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }

    /// The loopback port encoded in the redirect URI.
    #[must_use]
    pub fn callback_port(&self) -> u16 {
        Url::parse(&self.redirect_uri)
            .ok()
            .and_then(|u| u.port())
            .unwrap_or(DEFAULT_CALLBACK_PORT)
    }

    /// The callback route encoded in the redirect URI.
    #[must_use]
    pub fn callback_path(&self) -> String {
        match Url::parse(&self.redirect_uri) {
            Ok(u) if u.path() != "/" && !u.path().is_empty() => u.path().to_string(),
            _ => DEFAULT_CALLBACK_PATH.to_string(),
        }
    }

    /// Convenience constructor for building secrets directly, used by the
    /// integration tests.
    #[must_use]
    pub fn from_parts(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        auth_uri: impl Into<String>,
        token_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_uri: auth_uri.into(),
            token_uri: token_uri.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_secrets(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_web_section() {
        let file = write_secrets(
            r#"{"web": {"client_id": "id-1", "client_secret": "sec-1",
                "redirect_uris": ["http://localhost:8888/sso"],
                "auth_uri": "https://accounts.google.com/o/oauth2/v2/auth",
                "token_uri": "https://oauth2.googleapis.com/token"}}"#,
        );
        let secrets = ClientSecrets::load(file.path()).unwrap();
        assert_eq!(secrets.client_id, "id-1");
        assert_eq!(secrets.client_secret, "sec-1");
        assert_eq!(secrets.redirect_uri, "http://localhost:8888/sso");
        assert_eq!(secrets.callback_port(), 8888);
        assert_eq!(secrets.callback_path(), "/sso");
    }

    #[test]
    fn test_load_installed_section() {
        let file = write_secrets(
            r#"{"installed": {"client_id": "id-2", "client_secret": "sec-2",
                "redirect_uris": ["http://127.0.0.1:9999/callback"]}}"#,
        );
        let secrets = ClientSecrets::load(file.path()).unwrap();
        assert_eq!(secrets.client_id, "id-2");
        assert_eq!(secrets.callback_port(), 9999);
        assert_eq!(secrets.callback_path(), "/callback");
        // Endpoints fall back to the Google defaults
        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_load_prefers_web_over_installed() {
        let file = write_secrets(
            r#"{"web": {"client_id": "web-id", "client_secret": "s",
                "redirect_uris": ["http://localhost:8888/sso"]},
                "installed": {"client_id": "installed-id", "client_secret": "s",
                "redirect_uris": ["http://localhost:8888/sso"]}}"#,
        );
        let secrets = ClientSecrets::load(file.path()).unwrap();
        assert_eq!(secrets.client_id, "web-id");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = ClientSecrets::load(Path::new("/nonexistent/credentials.json"));
        assert!(matches!(result, Err(AuthError::SecretsIo { .. })));
    }

    #[test]
    fn test_load_malformed_json_is_parse_error() {
        let file = write_secrets("{not json");
        let result = ClientSecrets::load(file.path());
        assert!(matches!(result, Err(AuthError::SecretsParse { .. })));
    }

    #[test]
    fn test_load_missing_sections_is_incomplete() {
        let file = write_secrets(r#"{"other": {}}"#);
        let result = ClientSecrets::load(file.path());
        assert!(matches!(result, Err(AuthError::SecretsIncomplete { .. })));
    }

    #[test]
    fn test_load_empty_redirect_uris_is_incomplete() {
        let file = write_secrets(
            r#"{"web": {"client_id": "id", "client_secret": "s", "redirect_uris": []}}"#,
        );
        let result = ClientSecrets::load(file.path());
        assert!(matches!(result, Err(AuthError::SecretsIncomplete { .. })));
    }

    #[test]
    fn test_callback_port_defaults_without_explicit_port() {
        let secrets = ClientSecrets::from_parts(
            "id",
            "s",
            "http://localhost/sso",
            DEFAULT_AUTH_URI,
            DEFAULT_TOKEN_URI,
        );
        assert_eq!(secrets.callback_port(), DEFAULT_CALLBACK_PORT);
    }

    #[test]
    fn test_callback_path_defaults_for_bare_uri() {
        let secrets = ClientSecrets::from_parts(
            "id",
            "s",
            "http://localhost:8888",
            DEFAULT_AUTH_URI,
            DEFAULT_TOKEN_URI,
        );
        assert_eq!(secrets.callback_path(), DEFAULT_CALLBACK_PATH);
    }
}
