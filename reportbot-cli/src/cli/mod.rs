//! Command-line interface definitions

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::reports::ReportsCommands;

#[derive(Parser, Debug)]
#[command(name = "reportbot", version, about = "Load, dispatch and export client reports")]
pub struct Cli {
    /// Config file (defaults to ~/.config/reportbot/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database URL, overrides the config file and REPORTBOT_DATABASE_URL
    #[arg(long, global = true, value_name = "URL")]
    pub database: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import reports from a spreadsheet, skipping ids already stored
    Migrate {
        /// Spreadsheet (.xlsx, .xls, .ods) or .csv file
        file: PathBuf,
    },
    /// Send every pending report and log the dispatch
    Dispatch,
    /// Write today's dispatch log to CSV
    Export {
        /// Output file (defaults to the configured export path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import, dispatch and export in one go
    Run {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Browse stored reports
    #[command(subcommand)]
    Reports(ReportsCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_global_options() {
        let cli = Cli::try_parse_from([
            "reportbot",
            "run",
            "reportes_pendientes.xlsx",
            "--output",
            "out.csv",
            "--database",
            "sqlite::memory:",
        ])
        .unwrap();

        assert_eq!(cli.database.as_deref(), Some("sqlite::memory:"));
        match cli.command {
            Commands::Run { file, output } => {
                assert_eq!(file, PathBuf::from("reportes_pendientes.xlsx"));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_reports_list() {
        let cli = Cli::try_parse_from([
            "reportbot", "reports", "list", "--search", "acme", "--page", "2", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Reports(ReportsCommands::List { search, page, format, .. }) => {
                assert_eq!(search.as_deref(), Some("acme"));
                assert_eq!(page, 2);
                assert!(matches!(format, commands::reports::OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
