use lore_core::auth::AuthClient;
use lore_core::config::ApiConfig;

use crate::error::CliError;
use crate::session::SessionStore;

fn auth_client() -> Result<AuthClient<SessionStore>, CliError> {
    let config = ApiConfig::from_env()?;
    Ok(AuthClient::new(config, SessionStore::new())?)
}

pub async fn run_register(name: &str, email: &str, password: &str) -> Result<(), CliError> {
    let client = auth_client()?;
    client.register(name, email, password).await?;
    println!("Account created for {email}. Run `lore auth login` to sign in.");
    Ok(())
}

pub async fn run_login(email: &str, password: &str) -> Result<(), CliError> {
    let client = auth_client()?;
    let session = client.login(email, password).await?;
    println!("Logged in as {} ({})", session.name, session.user_id);
    Ok(())
}

pub fn run_status() -> Result<(), CliError> {
    let client = auth_client()?;
    match client.session()? {
        Some(session) => println!("Logged in as {} ({})", session.name, session.user_id),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn run_logout() -> Result<(), CliError> {
    let client = auth_client()?;
    client.logout()?;
    println!("Logged out.");
    Ok(())
}
