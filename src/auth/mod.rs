// Authentication module
// Loads Google OAuth2 credentials and holds the authorized client

mod client;
mod credentials;
mod manager;
mod types;

pub use client::{AuthorizationRequest, AuthorizedClient};
pub use credentials::{load_credentials, load_token, parse_credentials};
pub use manager::CredentialManager;
pub use types::{ClientKind, CredentialConfig, TokenConfig, DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI};
