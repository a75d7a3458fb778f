// src/store/database.rs

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::OnceCell;

use super::StoreError;

/// Owned handle to the PostgreSQL pool.
///
/// The pool is created on the first successful [`Database::pool`] call and
/// reused afterwards. Concurrent callers share a single connection attempt;
/// a failed attempt leaves the handle empty so the next call tries again.
#[derive(Debug)]
pub struct Database {
    url: String,
    max_connections: u32,
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            pool: OnceCell::new(),
        }
    }

    /// Acquires the pool, connecting if this is the first use.
    pub async fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool
            .get_or_try_init(|| async {
                tracing::debug!("Opening database pool");
                PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(&self.url)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))
            })
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }
}
