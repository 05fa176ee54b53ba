//! # SDW Common Library
//!
//! Shared code for the viewing-analytics warehouse tooling:
//! - Error type used across the ETL stages
//! - Configuration resolution (CLI > env > TOML > defaults)
//! - Date-key derivation for the date dimension
//! - Database connection helpers, DDL and row models

pub mod config;
pub mod date_key;
pub mod db;
pub mod error;

pub use date_key::{date_key, DateKey};
pub use error::{Error, Result};
