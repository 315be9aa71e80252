//! Subcommand handlers

pub mod dispatch;
pub mod export;
pub mod migrate;
pub mod reports;
pub mod run;
