//! Common error types for the warehouse ETL

use thiserror::Error;

/// Common result type for SDW operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ETL stages
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timestamp or date string could not be turned into calendar components
    #[error("Cannot parse date '{input}': {reason}")]
    DateParse { input: String, reason: String },

    /// Full-table read from the source store failed
    #[error("Extraction of '{table}' failed: {source}")]
    Extraction {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A source record could not be transformed
    #[error("Invalid record in {stage} ({record}): {reason}")]
    InvalidRecord {
        stage: &'static str,
        record: String,
        reason: String,
    },

    /// Destination write failed; the load transaction has been abandoned
    #[error("Load failed at {stage}: {source}")]
    Load {
        stage: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl Error {
    /// Wrap a sqlx error raised while reading `table` from the source store
    pub fn extraction(table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Error::Extraction { table, source }
    }

    /// Wrap a sqlx error raised during the `stage` load step
    pub fn load(stage: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Error::Load { stage, source }
    }
}
