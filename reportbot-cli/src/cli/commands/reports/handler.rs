//! Handlers for the report views

use anyhow::{Context, Result};

use super::{OutputFormat, ReportsCommands};
use crate::cli::output;
use crate::config::repository::reports::{self, ReportQuery};
use crate::config::{AppConfig, Database};

pub async fn handle_reports_command(
    db: &mut Database,
    config: &AppConfig,
    command: ReportsCommands,
) -> Result<()> {
    let pool = db.ensure_alive().await?;

    match command {
        ReportsCommands::Recent { limit } => {
            let limit = limit.unwrap_or(config.reports.recent_limit);
            let recent = reports::recent_reports(pool, limit).await?;
            if recent.is_empty() {
                output::print_notice("No reports to show.");
            } else {
                output::print_reports_table(&recent);
            }
        }
        ReportsCommands::List {
            search,
            page,
            page_size,
            format,
        } => {
            let query = ReportQuery {
                search,
                page,
                page_size: page_size.unwrap_or(config.reports.page_size),
            };
            let result = reports::search_reports(pool, &query).await?;

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&result)
                        .context("Failed to format JSON output")?;
                    println!("{}", json);
                }
                OutputFormat::Table => {
                    if result.reports.is_empty() {
                        output::print_notice("No reports match.");
                    } else {
                        output::print_reports_table(&result.reports);
                    }
                    output::print_page_footer(&result);
                }
            }
        }
    }

    Ok(())
}
