//! Configuration resolution tests
//!
//! Tests that touch SDW_* environment variables are marked #[serial] so they
//! never race each other.

use sdw_common::config::{
    CliOverrides, EtlConfig, TomlConfig, ENV_CONFIG_FILE, ENV_DESTINATION_DB, ENV_LOG_LEVEL,
    ENV_SOURCE_DB,
};
use sdw_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_SOURCE_DB);
    env::remove_var(ENV_DESTINATION_DB);
    env::remove_var(ENV_LOG_LEVEL);
    env::remove_var(ENV_CONFIG_FILE);
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_toml_config_parses_all_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        source_db = "/data/source.db"
        destination_db = "/data/warehouse.db"
        log_level = "debug"
        "#,
    );

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.source_db, Some(PathBuf::from("/data/source.db")));
    assert_eq!(config.destination_db, Some(PathBuf::from("/data/warehouse.db")));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_toml_config_keys_are_optional() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "log_level = \"warn\"\n");

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.source_db, None);
    assert_eq!(config.destination_db, None);
}

#[test]
fn test_malformed_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "source_db = [unterminated");

    assert!(matches!(TomlConfig::load(&path), Err(Error::Config(_))));
}

#[test]
fn test_unknown_key_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "sourcedb = \"typo.db\"\n");

    assert!(matches!(TomlConfig::load(&path), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_cli_overrides_win() {
    clear_env();
    env::set_var(ENV_SOURCE_DB, "/env/source.db");

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "source_db = \"/file/source.db\"\n");

    let cli = CliOverrides {
        config_file: Some(path),
        source_db: Some(PathBuf::from("/cli/source.db")),
        ..Default::default()
    };
    let config = EtlConfig::resolve(&cli).unwrap();
    assert_eq!(config.source_db, PathBuf::from("/cli/source.db"));

    clear_env();
}

#[test]
#[serial]
fn test_env_beats_config_file() {
    clear_env();
    env::set_var(ENV_DESTINATION_DB, "/env/warehouse.db");

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "destination_db = \"/file/warehouse.db\"\nlog_level = \"trace\"\n",
    );

    let cli = CliOverrides {
        config_file: Some(path),
        ..Default::default()
    };
    let config = EtlConfig::resolve(&cli).unwrap();
    assert_eq!(config.destination_db, PathBuf::from("/env/warehouse.db"));
    assert_eq!(config.log_level, "trace");

    clear_env();
}

#[test]
#[serial]
fn test_config_file_from_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "source_db = \"/file/source.db\"\n");
    env::set_var(ENV_CONFIG_FILE, &path);

    let config = EtlConfig::resolve(&CliOverrides::default()).unwrap();
    assert_eq!(config.source_db, PathBuf::from("/file/source.db"));

    clear_env();
}

#[test]
#[serial]
fn test_explicit_missing_config_file_is_error() {
    clear_env();
    let cli = CliOverrides {
        config_file: Some(PathBuf::from("/nonexistent/sdw/config.toml")),
        ..Default::default()
    };

    assert!(matches!(EtlConfig::resolve(&cli), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_defaults_when_nothing_set() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let cli = CliOverrides {
        config_file: Some(path),
        ..Default::default()
    };
    let config = EtlConfig::resolve(&cli).unwrap();
    assert_eq!(config, EtlConfig::default());
    assert_eq!(config.source_db, PathBuf::from("./source.db"));
    assert_eq!(config.destination_db, PathBuf::from("./destination.db"));
    assert_eq!(config.log_level, "info");
}
