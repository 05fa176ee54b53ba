//! Database connection setup
//!
//! The source store is only ever read by the ETL job, so it is opened in
//! read-only mode. The destination store is created on demand and its
//! star schema ensured before use.

use crate::db::schema::{create_destination_schema, create_source_schema};
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Connect to the source store in read-only mode
///
/// A missing file is reported instead of silently creating an empty store.
pub async fn connect_source(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Source database not found: {} (run `sdw-etl init` and `sdw-etl seed` first)",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=ro", db_path.display());
    let options = SqliteConnectOptions::from_str(&db_url)?.busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("Opened source database (read-only): {}", db_path.display());
    Ok(pool)
}

/// Open the source store for writing, creating it and its tables if needed
///
/// Used by schema setup and seeding only; the ETL job never writes the source.
pub async fn open_source_for_write(db_path: &Path) -> Result<SqlitePool> {
    let pool = open_read_write(db_path).await?;
    create_source_schema(&pool).await?;
    Ok(pool)
}

/// Connect to the destination store, creating it and its tables if needed
pub async fn connect_destination(db_path: &Path) -> Result<SqlitePool> {
    let pool = open_read_write(db_path).await?;
    create_destination_schema(&pool).await?;
    Ok(pool)
}

async fn open_read_write(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // foreign_keys is a per-connection pragma, so it goes on the connect options
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    Ok(pool)
}
