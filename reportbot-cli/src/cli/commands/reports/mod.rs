//! `reportbot reports`: read-only views over stored reports

mod handler;

pub use handler::handle_reports_command;

use clap::{Subcommand, ValueEnum};

#[derive(Subcommand, Debug)]
pub enum ReportsCommands {
    /// Show the most recently loaded reports
    Recent {
        /// Number of reports (defaults to reports.recent_limit)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List reports, optionally filtered by client or content
    List {
        /// Text matched against client and content
        #[arg(short, long)]
        search: Option<String>,
        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Rows per page (defaults to reports.page_size)
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
