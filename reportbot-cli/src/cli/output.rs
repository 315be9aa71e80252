//! Terminal output for command results

use colored::*;
use std::path::Path;

use crate::config::repository::reports::ReportPage;
use crate::models::Report;
use crate::services::dispatch::DispatchOutcome;
use crate::services::export::ExportOutcome;
use crate::services::import::MigrationSummary;

const SEPARATOR: &str = "------------------------------------------";

pub fn print_step(number: u32, title: &str) {
    println!();
    println!("{}", format!("Step {}: {}", number, title).bold());
}

pub fn print_notice(message: &str) {
    println!("{}", message.dimmed());
}

pub fn print_error(context: &str, error: &dyn std::fmt::Display) {
    eprintln!("{} {}", format!("{}:", context).bright_red().bold(), error);
}

pub fn print_import_start(file: &Path) {
    println!("{}", SEPARATOR.dimmed());
    println!("{} {}", "Loading from:".bold(), file.display().to_string().cyan());
}

pub fn print_migration_summary(summary: &MigrationSummary) {
    if summary.valid_rows() == 0 {
        println!("{}", "No valid rows to migrate after validation.".yellow());
    }

    println!(
        "{} {} new reports inserted, {} already existed.",
        "Migration complete:".bold(),
        summary.migrated.to_string().bright_green(),
        summary.already_present.to_string().cyan()
    );

    if summary.dropped > 0 {
        println!(
            "{} {} rows with incomplete or invalid data were skipped:",
            "Warning:".yellow().bold(),
            summary.dropped
        );
        for dropped in &summary.dropped_rows {
            println!("  line {}: {}", dropped.line, dropped.reason);
        }
    }

    if summary.failed > 0 {
        println!(
            "{} {} rows could not be inserted:",
            "Error:".bright_red().bold(),
            summary.failed
        );
        for failure in &summary.failures {
            println!("  line {} (id {}): {}", failure.line, failure.id, failure.error);
        }
    }
}

pub fn print_dispatch_outcome(outcome: &DispatchOutcome) {
    let summary = match outcome {
        DispatchOutcome::NothingPending => {
            println!("{} no pending reports to send.", "Dispatch:".bold());
            return;
        }
        DispatchOutcome::Processed(summary) => summary,
    };

    for sent in &summary.dispatched {
        println!("  {}", sent.message);
    }
    for failure in &summary.failures {
        println!(
            "  {} report {} stays pending: {}",
            "Failed:".bright_red(),
            failure.id,
            failure.error
        );
    }

    println!(
        "{} {} reports were processed and sent (simulated).",
        "Dispatch complete:".bold(),
        outcome.dispatched_count().to_string().bright_green()
    );
}

pub fn print_export_outcome(outcome: &ExportOutcome) {
    match outcome {
        ExportOutcome::Written { path, rows } => println!(
            "{} {} ({} rows)",
            "Daily dispatch report written:".bold(),
            path.display().to_string().bright_green(),
            rows
        ),
        ExportOutcome::NothingToExport { day } => println!(
            "{} no dispatches recorded today ({}).",
            "Export:".bold(),
            day.format("%Y-%m-%d")
        ),
    }
}

pub fn print_reports_table(reports: &[Report]) {
    println!(
        "{}",
        format!("{:<8} {:<24} {:<54} {}", "ID", "Client", "Content (excerpt)", "Status").bold()
    );

    for report in reports {
        let status = match report.estado {
            crate::models::ReportStatus::Pending => report.estado.as_str().yellow(),
            crate::models::ReportStatus::Sent => report.estado.as_str().green(),
        };
        println!(
            "{:<8} {:<24} {:<54} {}",
            report.id,
            report.cliente,
            report.content_preview(),
            status
        );
    }
}

pub fn print_page_footer(page: &ReportPage) {
    println!(
        "{}",
        format!(
            "Page {} of {} ({} reports)",
            page.page,
            page.total_pages().max(1),
            page.total
        )
        .dimmed()
    );
}
