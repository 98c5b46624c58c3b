// Credential and token types

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Google's OAuth2 consent endpoint, used when the credential file omits `auth_uri`
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's token endpoint, used when the credential file omits `token_uri`
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Which section of the client secret file the credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Web application client
    Web,
    /// Desktop / installed application client
    Installed,
}

impl ClientKind {
    /// Key of the section in the client secret JSON
    pub fn key(self) -> &'static str {
        match self {
            ClientKind::Web => "web",
            ClientKind::Installed => "installed",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Validated application credentials, built by `parse_credentials`
#[derive(Clone)]
pub struct CredentialConfig {
    pub(crate) kind: ClientKind,
    pub(crate) client_id: String,
    pub(crate) client_secret: SecretString,
    /// Non-empty once validated; kept as given, not parsed as URLs
    pub(crate) redirect_uris: Vec<String>,
    pub(crate) auth_uri: String,
    pub(crate) token_uri: String,
}

impl CredentialConfig {
    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// The redirect URI handed to the OAuth2 client (the first one listed)
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn redirect_uris(&self) -> &[String] {
        &self.redirect_uris
    }

    pub fn auth_uri(&self) -> &str {
        &self.auth_uri
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }
}

impl fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uris", &self.redirect_uris)
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Previously obtained token, kept as the JSON it was supplied in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenConfig(Value);

impl TokenConfig {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    pub fn access_token(&self) -> Option<&str> {
        self.field("access_token")
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.field("refresh_token")
    }

    /// `expiry_date` in milliseconds since the Unix epoch, as Google issues it
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let millis = self.0.get("expiry_date")?.as_i64()?;
        DateTime::from_timestamp_millis(millis)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_str())
    }
}
