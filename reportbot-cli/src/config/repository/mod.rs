//! Repository layer for database operations

pub mod dispatch_log;
pub mod reports;
