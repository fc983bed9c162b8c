//! Session commands. The CLI has no tab to close, so a CLI login always lands
//! in the persistent tier.

use anyhow::{Context, Result};
use shelf_core::Config;
use shelf_core::api::ApiClient;
use shelf_core::auth::{AuthGateway, Credentials, RememberPolicy, SessionStore};
use tracing::info;

fn gateway(config: &Config) -> Result<AuthGateway> {
    let api = ApiClient::from_config(config).context("build HTTP client")?;
    Ok(AuthGateway::new(api, config.token_expires_in_mins))
}

pub async fn login(config: &Config, username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        anyhow::bail!("Username and password are required");
    }

    let credentials = Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    let tokens = gateway(config)?.login(&credentials).await?;

    SessionStore::open_default()
        .save(&tokens, RememberPolicy::Remember)
        .context("save session")?;
    info!(username = %credentials.username, "signed in from CLI");
    println!("You're signed in!");
    Ok(())
}

pub fn logout() -> Result<()> {
    SessionStore::open_default()
        .clear()
        .context("clear session")?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let session = SessionStore::open_default();
    let Some(token) = session.access_token().context("read session")? else {
        anyhow::bail!("Not signed in. Run `shelf login` first.");
    };

    let user = gateway(config)?.me(&token).await?;
    println!("{} <{}>", user.display_name(), user.email);
    println!("username: {}", user.username);
    println!("id: {}", user.id);
    Ok(())
}
