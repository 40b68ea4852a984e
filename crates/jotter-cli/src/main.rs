//! Jotter CLI - write, edit and delete notes from the terminal
//!
//! Every mutation goes through the same editor dialog the other surfaces use.

mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::Session;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        if !error.already_reported() {
            eprintln!("Error: {error}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref())?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Add { title, content } => {
            run_add(title, &content, &Session::connect(profile)?).await?;
        }
        Commands::List { limit, json } => {
            run_list(limit, json, &Session::connect(profile)?).await?;
        }
        Commands::Show { id } => run_show(&id, &Session::connect(profile)?).await?,
        Commands::Edit { id, title, content } => {
            run_edit(&id, title, content, &Session::connect(profile)?).await?;
        }
        Commands::Delete { id } => run_delete(&id, &Session::connect(profile)?).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
        Commands::Config { command } => run_config(command, profile)?,
    }

    Ok(())
}

/// Only the CLI's own warnings reach stderr unless `RUST_LOG` asks for more.
fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter, CliError> {
    let directive = "jot=warn"
        .parse::<Directive>()
        .map_err(|error| CliError::Config(error.to_string()))?;
    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(rust_log.unwrap_or_default())
        .add_directive(directive))
}
