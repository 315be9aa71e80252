//! Store handle with an explicit, caller-managed lifetime
//!
//! The handle wraps a single-connection SQLite pool. Callers create it once,
//! call [`Database::ensure_alive`] before each batch of work and
//! [`Database::close`] when done.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub struct Database {
    url: String,
    pool: SqlitePool,
}

impl Database {
    /// Open the store and bring its schema up to date
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = open_pool(url).await?;
        log::info!("Connected to store at {}", url);
        Ok(Self {
            url: url.to_string(),
            pool,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Probe the connection and reconnect once if it is gone
    pub async fn ensure_alive(&mut self) -> Result<&SqlitePool> {
        if !self.pool.is_closed() && ping(&self.pool).await.is_ok() {
            return Ok(&self.pool);
        }

        log::warn!("Store connection lost, reconnecting to {}", self.url);
        self.pool.close().await;
        self.pool = open_pool(&self.url)
            .await
            .context("Failed to reconnect to the store")?;
        Ok(&self.pool)
    }

    pub async fn close(self) {
        self.pool.close().await;
        log::debug!("Store connection to {} closed", self.url);
    }

    /// Fresh in-memory store for tests
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect("sqlite::memory:")
            .await
            .expect("in-memory store should open")
    }
}

async fn ping(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Store liveness probe failed")?;
    Ok(())
}

async fn open_pool(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database URL: {}", url))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory store lives only as long as its single connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to the store at {}", url))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run store migrations")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_schema() {
        let db = Database::in_memory().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('reportes', 'log_envios', 'usuarios') ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(names, vec!["log_envios", "reportes", "usuarios"]);
    }

    #[tokio::test]
    async fn test_ensure_alive_reuses_healthy_connection() {
        let mut db = Database::in_memory().await;
        sqlx::query("INSERT INTO reportes (id, cliente, contenido, estado) VALUES (1, 'Acme', 'Hola', 'pendiente')")
            .execute(db.pool())
            .await
            .unwrap();

        let pool = db.ensure_alive().await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reportes")
            .fetch_one(pool)
            .await
            .unwrap();

        // Same in-memory connection, so the row is still there
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_ensure_alive_reconnects_closed_pool() {
        let mut db = Database::in_memory().await;
        db.pool().close().await;
        assert!(db.pool().is_closed());

        let pool = db.ensure_alive().await.unwrap();
        assert!(!pool.is_closed());
        assert!(ping(pool).await.is_ok());
    }
}
