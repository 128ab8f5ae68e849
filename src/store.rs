//! Connection pool setup.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Connection options for `database_url`. The database file is created if missing.
///
/// Foreign-key enforcement is switched off: movies may keep references to
/// genres and directors that have since been deleted.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, AppError> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false))
}

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    connect_with(connect_options(database_url)?, max_connections).await
}

pub async fn connect_with(options: SqliteConnectOptions, max_connections: u32) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}
