//! sdw-etl - viewing-analytics warehouse loader
//!
//! Subcommands:
//! - `init`: (re)create the source and destination schemas
//! - `seed`: load the sample data into the source store
//! - `run`:  run the full-refresh ETL job (default)
//!
//! Exit status is non-zero when the job fails.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sdw_common::config::{CliOverrides, EtlConfig};
use sdw_common::db::{
    connect_destination, open_source_for_write, reset_destination_schema, reset_source_schema,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sdw-etl
#[derive(Parser, Debug)]
#[command(name = "sdw-etl")]
#[command(about = "Load the viewing-analytics star schema from the transactional store")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, global = true, env = "SDW_CONFIG")]
    config: Option<PathBuf>,

    /// Source (transactional) SQLite database
    #[arg(long, global = true, env = "SDW_SOURCE_DB")]
    source_db: Option<PathBuf>,

    /// Destination (star schema) SQLite database
    #[arg(long, global = true, env = "SDW_DESTINATION_DB")]
    destination_db: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "SDW_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Drop and recreate the source and destination schemas
    Init,
    /// Replace the source contents with the sample data
    Seed,
    /// Run the ETL job
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = EtlConfig::resolve(&CliOverrides {
        config_file: args.config.clone(),
        source_db: args.source_db.clone(),
        destination_db: args.destination_db.clone(),
        log_level: args.log_level.clone(),
    })
    .context("Failed to resolve configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting sdw-etl v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Source database: {}", config.source_db.display());
    info!("Destination database: {}", config.destination_db.display());

    let result = match args.command.unwrap_or(Command::Run) {
        Command::Init => init(&config).await,
        Command::Seed => seed(&config).await,
        Command::Run => sdw_etl::run_job(&config)
            .await
            .map(|_| ())
            .context("ETL run failed"),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn init(config: &EtlConfig) -> Result<()> {
    let source = open_source_for_write(&config.source_db)
        .await
        .context("Failed to open source database")?;
    reset_source_schema(&source).await?;

    let destination = connect_destination(&config.destination_db)
        .await
        .context("Failed to open destination database")?;
    reset_destination_schema(&destination).await?;

    info!("Schemas created");
    Ok(())
}

async fn seed(config: &EtlConfig) -> Result<()> {
    let source = open_source_for_write(&config.source_db)
        .await
        .context("Failed to open source database")?;
    sdw_etl::seed::seed_source(&source)
        .await
        .context("Failed to seed source database")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_is_default_and_globals_follow_subcommand() {
        let args = Args::try_parse_from(["sdw-etl"]).unwrap();
        assert!(args.command.is_none());

        let args = Args::try_parse_from([
            "sdw-etl",
            "seed",
            "--source-db",
            "/data/source.db",
        ])
        .unwrap();
        assert!(matches!(args.command, Some(Command::Seed)));
        assert_eq!(args.source_db, Some(PathBuf::from("/data/source.db")));
    }

    #[test]
    fn test_destination_read_from_environment() {
        std::env::set_var("SDW_DESTINATION_DB", "/env/warehouse.db");
        let from_env = Args::try_parse_from(["sdw-etl", "run"]).unwrap();
        let from_cli =
            Args::try_parse_from(["sdw-etl", "run", "--destination-db", "/cli/warehouse.db"])
                .unwrap();
        std::env::remove_var("SDW_DESTINATION_DB");

        assert_eq!(from_env.destination_db, Some(PathBuf::from("/env/warehouse.db")));
        assert_eq!(from_cli.destination_db, Some(PathBuf::from("/cli/warehouse.db")));
    }
}
