use anyhow::{Context, Result};

use google_auth_env::auth::CredentialManager;
use google_auth_env::config::CliArgs;

fn main() -> Result<()> {
    let args = CliArgs::load();

    // Initialize logging with a configured level
    let log_level = args.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let manager = CredentialManager::new(args.source());
    manager
        .initialize()
        .context("Failed to load Google credentials")?;

    let client = manager.authorized_client()?;

    println!();
    println!("  Client type:   {}", client.kind());
    println!("  Client ID:     {}", mask(client.client_id()));
    println!("  Redirect URI:  {}", client.redirect_uri());

    match client.credentials() {
        Some(token) => {
            println!(
                "  Token:         attached (refresh token: {})",
                if token.refresh_token().is_some() {
                    "yes"
                } else {
                    "no"
                }
            );
            if let Some(expiry) = token.expiry() {
                println!("  Token expiry:  {}", expiry.to_rfc3339());
            }
        }
        None => println!("  Token:         none"),
    }

    if !args.scopes.is_empty() {
        let request = client
            .authorize_url(args.scopes.iter().cloned())
            .context("Failed to build authorization URL")?;
        println!();
        println!("  Authorize at:  {}", request.url);
    }
    println!();

    Ok(())
}

/// Show only the first characters of an identifier
fn mask(value: &str) -> String {
    let visible: String = value.chars().take(8).collect();
    if visible.len() < value.len() {
        format!("{}...", visible)
    } else {
        visible
    }
}
