use std::env;
use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Owns the MySQL pool every service clones from at startup.
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Connect to `database_url`. Pool size can be overridden with the
    /// `DATABASE_MAX_CONNECTIONS` environment variable; a bounded acquire
    /// timeout keeps a saturated pool from hanging requests indefinitely.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }
}
