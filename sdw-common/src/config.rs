//! Configuration loading
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_SOURCE_DB: &str = "SDW_SOURCE_DB";
pub const ENV_DESTINATION_DB: &str = "SDW_DESTINATION_DB";
pub const ENV_LOG_LEVEL: &str = "SDW_LOG_LEVEL";
pub const ENV_CONFIG_FILE: &str = "SDW_CONFIG";

pub const DEFAULT_SOURCE_DB: &str = "./source.db";
pub const DEFAULT_DESTINATION_DB: &str = "./destination.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub source_db: Option<PathBuf>,
    pub destination_db: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub source_db: Option<PathBuf>,
    pub destination_db: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved ETL configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EtlConfig {
    pub source_db: PathBuf,
    pub destination_db: PathBuf,
    pub log_level: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source_db: PathBuf::from(DEFAULT_SOURCE_DB),
            destination_db: PathBuf::from(DEFAULT_DESTINATION_DB),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EtlConfig {
    /// Resolve configuration from CLI overrides, environment, config file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = match config_file_path(cli.config_file.as_deref())? {
            Some(path) => {
                debug!("Loading config file: {}", path.display());
                TomlConfig::load(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                TomlConfig::default()
            }
        };

        let defaults = EtlConfig::default();

        Ok(Self {
            source_db: cli
                .source_db
                .clone()
                .or_else(|| env_path(ENV_SOURCE_DB))
                .or(file.source_db)
                .unwrap_or(defaults.source_db),
            destination_db: cli
                .destination_db
                .clone()
                .or_else(|| env_path(ENV_DESTINATION_DB))
                .or(file.destination_db)
                .unwrap_or(defaults.destination_db),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| env_string(ENV_LOG_LEVEL))
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
        })
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_path(name: &str) -> Option<PathBuf> {
    env_string(name).map(PathBuf::from)
}

/// Locate the config file.
///
/// An explicitly named file (CLI or `SDW_CONFIG`) must exist. Otherwise the
/// platform config directory is searched and absence is not an error.
fn config_file_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit.map(Path::to_path_buf).or_else(|| env_path(ENV_CONFIG_FILE)) {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    Ok(default_config_candidates().into_iter().find(|p| p.exists()))
}

/// Default config file locations for the platform, most specific first
fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = dirs::config_dir()
        .map(|d| d.join("sdw").join("config.toml"))
        .into_iter()
        .collect();

    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/sdw/config.toml"));
    }

    candidates
}
