//! MySQL connection settings
//!
//! The database name goes into the connect options rather than a `USE`
//! statement so every pooled connection is pinned to the right schema.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::info;

use crate::error::Result;

/// Server coordinates shared by the books and progress databases.
#[derive(Debug, Clone)]
pub struct MysqlSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl MysqlSettings {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
    }

    /// Open a pool against one database.
    ///
    /// `max_connections` must cover the writer pool plus the startup cache
    /// load; the caller passes `db_writers + 1`.
    pub async fn pool(&self, database: &str, max_connections: u32) -> Result<MySqlPool> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(self.connect_options().database(database))
            .await?;
        info!(database, max_connections, "database pool opened");
        Ok(pool)
    }

    /// Create the named databases if they do not exist yet.
    ///
    /// Connects without a database selected; the connection is dropped once
    /// the statements ran.
    pub async fn create_databases(&self, names: &[&str]) -> Result<()> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(self.connect_options())
            .await?;

        for name in names {
            let statement = format!(
                "CREATE DATABASE IF NOT EXISTS {name} \
                 DEFAULT CHARACTER SET = 'utf8mb4' DEFAULT COLLATE 'utf8mb4_bin'"
            );
            sqlx::query(&statement).execute(&pool).await?;
        }

        pool.close().await;
        Ok(())
    }
}
