mod cli;
mod config;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use colored::*;

use cli::commands::dispatch::handle_dispatch_command;
use cli::commands::export::handle_export_command;
use cli::commands::migrate::handle_migrate_command;
use cli::commands::reports::handle_reports_command;
use cli::commands::run::handle_run_command;
use cli::{Cli, Commands};
use config::{AppConfig, Database};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.database {
        config.database.url = url;
    }

    let mut db = Database::connect(&config.database.url).await?;

    let result = match cli.command {
        Commands::Migrate { file } => handle_migrate_command(&mut db, &file).await,
        Commands::Dispatch => handle_dispatch_command(&mut db).await,
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| config.export.path.clone());
            handle_export_command(&mut db, &path).await
        }
        Commands::Run { file, output } => {
            let path = output.unwrap_or_else(|| config.export.path.clone());
            handle_run_command(&mut db, &file, &path).await
        }
        Commands::Reports(command) => handle_reports_command(&mut db, &config, command).await,
    };

    db.close().await;
    result
}
