use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

use super::client::AuthorizedClient;
use super::credentials;
use crate::config::{ConfigSource, EnvSource, CREDENTIALS_VAR, TOKEN_VAR};
use crate::error::{AuthError, Result};

static GLOBAL: Lazy<CredentialManager> = Lazy::new(|| CredentialManager::new(EnvSource));

/// Credential manager
/// Loads credentials from its configuration source and holds the current authorized client.
/// The client is swapped as a whole: readers see either the previous client or the new one.
pub struct CredentialManager {
    /// Where the credential and token blobs are read from
    source: Box<dyn ConfigSource>,

    /// Current authorized client, `None` until initialize() succeeds
    client: RwLock<Option<Arc<AuthorizedClient>>>,
}

impl CredentialManager {
    /// Create a manager reading from `source`; nothing is loaded until initialize()
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            client: RwLock::new(None),
        }
    }

    /// Process-wide manager over the process environment, created on first access
    pub fn global() -> &'static CredentialManager {
        &GLOBAL
    }

    /// Load credentials (and the token, if any) and replace the current client
    /// On failure the error is logged and the manager reports not initialized
    pub fn initialize(&self) -> Result<()> {
        match self.load() {
            Ok(client) => {
                tracing::info!(
                    kind = %client.kind(),
                    redirect_uri = client.redirect_uri(),
                    has_token = client.has_token(),
                    "Google credentials loaded"
                );
                self.store(Some(Arc::new(client)));
                Ok(())
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), "Error loading Google credentials: {}", e);
                self.store(None);
                Err(e)
            }
        }
    }

    /// Current authorized client
    pub fn authorized_client(&self) -> Result<Arc<AuthorizedClient>> {
        self.client
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(AuthError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn load(&self) -> Result<AuthorizedClient> {
        let blob = self
            .source
            .get_non_empty(CREDENTIALS_VAR)
            .ok_or(AuthError::ConfigMissing(CREDENTIALS_VAR))?;

        let config = credentials::load_credentials(&blob)?;
        let client = AuthorizedClient::new(config);

        if let Some(token_blob) = self.source.get_non_empty(TOKEN_VAR) {
            let token = credentials::load_token(&token_blob).map_err(|e| {
                tracing::error!("Error parsing token: {}", e);
                e
            })?;
            client.set_credentials(token);
        }

        Ok(client)
    }

    fn store(&self, client: Option<Arc<AuthorizedClient>>) {
        let mut slot = self.client.write().unwrap_or_else(|e| e.into_inner());
        *slot = client;
    }
}
