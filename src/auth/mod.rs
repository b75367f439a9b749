//! OAuth2 credential acquisition.
//!
//! The flow has two paths with a single completion point:
//!
//! 1. A cached token at the store path is returned immediately: no
//!    listener, no browser, no network. Its validity is not checked here;
//!    an expired access token is refreshed silently on first use.
//! 2. Otherwise the interactive loopback flow runs: bind the one-shot
//!    listener, open the authorization URL in the default browser
//!    (fire-and-forget), wait for exactly one redirect carrying the
//!    authorization code, exchange it at the token endpoint, and persist
//!    the payload for the next run.

mod credential;
mod error;
mod listener;
mod secrets;
mod store;

pub use credential::Credential;
pub use error::AuthError;
pub use listener::CallbackListener;
pub use secrets::{
    ClientSecrets, DEFAULT_AUTH_URI, DEFAULT_CALLBACK_PATH, DEFAULT_CALLBACK_PORT,
    DEFAULT_TOKEN_URI,
};
pub use store::{DEFAULT_TOKEN_PATH, TokenStore};

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenUrl,
};
use tracing::{debug, info, warn};

/// Scope required to read a photo library.
pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.readonly";

/// A `BasicClient` with authorization and token endpoints configured.
type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Configured OAuth2 flow: client endpoints plus the token cache.
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    secrets: ClientSecrets,
    store: TokenStore,
    client: ConfiguredClient,
    http: reqwest::Client,
}

impl OAuthFlow {
    /// Builds a flow from parsed client secrets and a token store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEndpoint` when a URL in the secrets does
    /// not parse, or `AuthError::HttpClient` when the token-endpoint HTTP
    /// client cannot be built.
    pub fn new(secrets: ClientSecrets, store: TokenStore) -> Result<Self, AuthError> {
        let auth_uri = AuthUrl::new(secrets.auth_uri.clone()).map_err(|_| {
            AuthError::InvalidEndpoint {
                url: secrets.auth_uri.clone(),
            }
        })?;
        let token_uri = TokenUrl::new(secrets.token_uri.clone()).map_err(|_| {
            AuthError::InvalidEndpoint {
                url: secrets.token_uri.clone(),
            }
        })?;
        let redirect_uri = RedirectUrl::new(secrets.redirect_uri.clone()).map_err(|_| {
            AuthError::InvalidEndpoint {
                url: secrets.redirect_uri.clone(),
            }
        })?;

        let client = BasicClient::new(ClientId::new(secrets.client_id.clone()))
            .set_client_secret(ClientSecret::new(secrets.client_secret.clone()))
            .set_auth_uri(auth_uri)
            .set_token_uri(token_uri)
            .set_redirect_uri(redirect_uri);

        // The oauth2 crate requires redirects disabled on the client it
        // uses for token-endpoint calls.
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|source| AuthError::HttpClient { source })?;

        Ok(Self {
            secrets,
            store,
            client,
            http,
        })
    }

    /// Obtains a credential for the given scopes.
    ///
    /// A usable token cache short-circuits the interactive flow entirely.
    /// When the cache is missing or corrupt, the loopback flow runs and
    /// blocks until the browser redirect arrives; there is no timeout.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the listener fails, the user denies
    /// consent, the code exchange is rejected, or the cache write fails.
    pub async fn acquire(&self, scopes: &[&str]) -> Result<Credential, AuthError> {
        if let Some(token) = self.store.load() {
            info!("using cached token");
            return Ok(Credential::cached(token));
        }
        self.interactive(scopes).await
    }

    /// Runs the interactive authorization-code flow.
    async fn interactive(&self, scopes: &[&str]) -> Result<Credential, AuthError> {
        // Bind before opening the browser so the redirect cannot race the
        // listener.
        let listener = CallbackListener::bind(self.secrets.callback_port()).await?;

        let (authorize_url, _csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.iter().map(|s| Scope::new((*s).to_string())))
            .add_extra_param("access_type", "offline")
            .url();

        info!(url = %authorize_url, "opening browser for authorization");
        if let Err(err) = open::that_detached(authorize_url.as_str()) {
            warn!(%err, url = %authorize_url, "could not launch a browser; open the URL manually");
        }

        let code = listener
            .wait_for_code(&self.secrets.callback_path())
            .await?;
        debug!("authorization code received, exchanging");

        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(&self.http)
            .await
            .map_err(AuthError::exchange)?;

        self.store.save(&token)?;
        info!("authorization complete, token cached");
        Ok(Credential::fresh(token))
    }

    /// Refreshes an expired credential in place.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoRefreshToken` when the credential has no
    /// refresh token, or `AuthError::Refresh` when the endpoint rejects
    /// the exchange.
    pub async fn refresh(&self, credential: &mut Credential) -> Result<(), AuthError> {
        let refresh_token = credential
            .refresh_token()
            .cloned()
            .ok_or(AuthError::NoRefreshToken)?;

        debug!("refreshing access token");
        let token = self
            .client
            .exchange_refresh_token(&refresh_token)
            .request_async(&self.http)
            .await
            .map_err(AuthError::refresh)?;

        credential.replace(token);
        Ok(())
    }

    /// The token store this flow persists to.
    #[must_use]
    pub fn store(&self) -> &TokenStore {
        &self.store
    }
}
