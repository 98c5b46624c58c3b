// Google Auth Env - OAuth2 credentials from environment variables

pub mod auth;
pub mod config;
pub mod error;

pub use auth::{AuthorizedClient, CredentialManager, TokenConfig};
pub use error::{AuthError, Result};
