// Error handling module
// Defines the error taxonomy for credential loading

use thiserror::Error;

/// Errors raised while loading credentials or reading the authorized client
#[derive(Error, Debug)]
pub enum AuthError {
    /// Credential blob not set
    #[error("{0} environment variable is not set")]
    ConfigMissing(&'static str),

    /// Credential blob is not base64-encoded JSON
    #[error("Failed to decode {var}: {reason}")]
    ConfigMalformed { var: &'static str, reason: String },

    /// Neither `web` nor `installed` present
    #[error(
        "Invalid credentials format: credentials must contain either 'web' or 'installed' configuration. Received keys: {}",
        .received_keys.join(", ")
    )]
    ConfigInvalidShape { received_keys: Vec<String> },

    /// Selected variant lacks a required field
    #[error(
        "Invalid credentials: missing required fields (client_secret, client_id, or redirect_uris): {missing}"
    )]
    ConfigIncomplete { missing: String },

    /// Redirect URI or endpoint rejected when starting an authorization flow
    /// Never raised by initialize(), which keeps these values as given
    #[error("Cannot start authorization: {field} is not a valid URL: {value}")]
    InvalidFlowUrl { field: &'static str, value: String },

    /// Token blob is not base64-encoded JSON
    #[error("Failed to parse {var}: {reason}")]
    TokenMalformed { var: &'static str, reason: String },

    /// No successful initialize() is current
    #[error("OAuth2 client not initialized")]
    NotInitialized,
}

impl AuthError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::ConfigMissing(_) => "config_missing",
            AuthError::ConfigMalformed { .. } => "config_malformed",
            AuthError::ConfigInvalidShape { .. } => "config_invalid_shape",
            AuthError::ConfigIncomplete { .. } => "config_incomplete",
            AuthError::InvalidFlowUrl { .. } => "invalid_flow_url",
            AuthError::TokenMalformed { .. } => "token_malformed",
            AuthError::NotInitialized => "not_initialized",
        }
    }
}

/// Result type alias for credential operations
pub type Result<T> = std::result::Result<T, AuthError>;
