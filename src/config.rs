use clap::Parser;
use std::collections::HashMap;

/// Base64-encoded client secret JSON (required)
pub const CREDENTIALS_VAR: &str = "GOOGLE_CREDENTIALS";

/// Base64-encoded token JSON (optional)
pub const TOKEN_VAR: &str = "GOOGLE_TOKEN";

/// Google Auth Check - validate OAuth2 credentials from the environment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base64-encoded client secret JSON
    #[arg(long, env = CREDENTIALS_VAR, hide_env_values = true)]
    pub credentials: Option<String>,

    /// Base64-encoded token JSON
    #[arg(long, env = TOKEN_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Print an authorization URL requesting these scopes
    #[arg(short, long = "scope")]
    pub scopes: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    /// Load arguments with priority: CLI > ENV > .env file
    pub fn load() -> Self {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::parse()
    }

    /// Credential and token blobs as a configuration source
    pub fn source(&self) -> HashMap<String, String> {
        let mut source = HashMap::new();
        if let Some(ref credentials) = self.credentials {
            source.insert(CREDENTIALS_VAR.to_string(), credentials.clone());
        }
        if let Some(ref token) = self.token {
            source.insert(TOKEN_VAR.to_string(), token.clone());
        }
        source
    }
}

/// Where the credential manager reads its blobs from
pub trait ConfigSource: Send + Sync {
    /// Raw value for `key`, if set
    fn get(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating an empty string as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}
