//! Lore CLI - Share geotagged photo stories from the command line
//!
//! Stories written while offline land in a local ledger and sync to the
//! remote service on demand.

mod cli;
mod commands;
mod error;
mod session;

use clap::Parser;

use crate::cli::{AuthCommands, Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::{run_login, run_logout, run_register, run_status};
use crate::commands::common::resolve_data_dir;
use crate::commands::completions::run_completions;
use crate::commands::list::{run_list, run_show};
use crate::commands::pending::run_pending;
use crate::commands::sync::run_sync;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Commands::Add {
            photo,
            description,
            lat,
            lon,
            guest,
        } => run_add(&photo, &description, lat, lon, guest, &data_dir).await?,
        Commands::List {
            page,
            size,
            location,
            json,
        } => run_list(page, size, location, json).await?,
        Commands::Show { id } => run_show(&id).await?,
        Commands::Pending { all, json } => run_pending(all, json, &data_dir)?,
        Commands::Sync => run_sync(&data_dir).await?,
        Commands::Auth { command } => match command {
            AuthCommands::Register {
                name,
                email,
                password,
            } => run_register(&name, &email, &password).await?,
            AuthCommands::Login { email, password } => run_login(&email, &password).await?,
            AuthCommands::Status => run_status()?,
            AuthCommands::Logout => run_logout()?,
        },
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
