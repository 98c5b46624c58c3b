// Authorized OAuth2 client handle

use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope, TokenUrl};
use std::sync::RwLock;

use super::types::{ClientKind, CredentialConfig, TokenConfig};
use crate::error::{AuthError, Result};

/// Authorization request ready to be opened in a browser
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_state: String,
}

/// Client identity plus the attached token
/// Values are kept as given; the OAuth2 client is built only when a flow starts.
/// The token slot may be replaced while the handle is shared.
pub struct AuthorizedClient {
    config: CredentialConfig,
    token: RwLock<Option<TokenConfig>>,
}

impl AuthorizedClient {
    pub fn new(config: CredentialConfig) -> Self {
        Self {
            config,
            token: RwLock::new(None),
        }
    }

    pub fn kind(&self) -> ClientKind {
        self.config.kind()
    }

    pub fn client_id(&self) -> &str {
        self.config.client_id()
    }

    pub fn client_secret(&self) -> &str {
        self.config.client_secret()
    }

    pub fn redirect_uri(&self) -> &str {
        self.config.redirect_uri()
    }

    pub fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Build the OAuth2 client from client id, secret, endpoints and the redirect URI
    pub fn oauth_client(&self) -> Result<BasicClient> {
        let auth_url = AuthUrl::new(self.config.auth_uri().to_string())
            .map_err(|_| invalid_url("auth_uri", self.config.auth_uri()))?;
        let token_url = TokenUrl::new(self.config.token_uri().to_string())
            .map_err(|_| invalid_url("token_uri", self.config.token_uri()))?;
        let redirect_url = RedirectUrl::new(self.redirect_uri().to_string())
            .map_err(|_| invalid_url("redirect_uris[0]", self.redirect_uri()))?;

        Ok(BasicClient::new(
            ClientId::new(self.client_id().to_string()),
            Some(ClientSecret::new(self.client_secret().to_string())),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url))
    }

    /// Attach (or replace) the token used for authenticated calls
    pub fn set_credentials(&self, token: TokenConfig) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token);
    }

    /// Snapshot of the attached token
    pub fn credentials(&self) -> Option<TokenConfig> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Consent URL for a fresh authorization with offline access
    pub fn authorize_url<I, S>(&self, scopes: I) -> Result<AuthorizationRequest>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let oauth = self.oauth_client()?;
        let (url, csrf_state) = oauth
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.into_iter().map(|s| Scope::new(s.into())))
            .add_extra_param("access_type", "offline")
            .url();

        Ok(AuthorizationRequest {
            url: url.to_string(),
            csrf_state: csrf_state.secret().clone(),
        })
    }
}

fn invalid_url(field: &'static str, value: &str) -> AuthError {
    AuthError::InvalidFlowUrl {
        field,
        value: value.to_string(),
    }
}

impl std::fmt::Debug for AuthorizedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("config", &self.config)
            .field("has_token", &self.has_token())
            .finish()
    }
}
