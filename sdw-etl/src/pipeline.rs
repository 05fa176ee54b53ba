//! ETL pipeline orchestration
//!
//! Stages run strictly in this order, each feeding the next:
//!
//! ```text
//! extract -> build dimensions -> load dimensions -> build facts -> load facts
//! ```
//!
//! Extraction and dimension building happen before the destination is
//! touched, so a bad source row aborts the run with the destination intact.
//! Everything from the first delete to the last fact insert shares one
//! transaction; a failure anywhere rolls back to the pre-run state.

use crate::dimensions::{build_dimensions, DimensionSet};
use crate::extract::{extract, SourceSnapshot};
use crate::facts::{build_facts, SkippedSubscription};
use crate::loader::{DimensionCounts, FactCounts, Loader};
use sdw_common::config::EtlConfig;
use sdw_common::db::{connect_destination, connect_source};
use sdw_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Extract,
    BuildDimensions,
    LoadDimensions,
    BuildFacts,
    LoadFacts,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "extract",
            Stage::BuildDimensions => "build-dimensions",
            Stage::LoadDimensions => "load-dimensions",
            Stage::BuildFacts => "build-facts",
            Stage::LoadFacts => "load-facts",
        };
        f.write_str(name)
    }
}

/// Outcome of one successful run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub dimensions: DimensionCounts,
    pub facts: FactCounts,
    pub skipped_subscriptions: Vec<SkippedSubscription>,
}

/// Open both stores named by `config` and run the pipeline once
pub async fn run_job(config: &EtlConfig) -> Result<RunReport> {
    let run_id = Uuid::new_v4();
    let span = info_span!("etl_run", %run_id);

    async {
        info!("Starting ETL process");
        // Source first: a missing source must not create an empty destination file
        let source = connect_source(&config.source_db).await?;
        let destination = connect_destination(&config.destination_db).await?;

        let report = run(&source, &destination).await;

        // Close both pools whether or not the run succeeded
        source.close().await;
        destination.close().await;
        info!("All database connections closed");

        report
    }
    .instrument(span)
    .await
}

/// Run the full-refresh pipeline against already-open stores
pub async fn run(source: &SqlitePool, destination: &SqlitePool) -> Result<RunReport> {
    // Nothing below touches the destination until Loader::begin; extraction and
    // date-parse failures leave it exactly as it was
    info!(stage = %Stage::Extract, "Extracting data from source");
    let snapshot = extract(source).await?;

    info!(stage = %Stage::BuildDimensions, "Transforming dimensions");
    let dims = build_dimensions(&snapshot)?;

    let mut loader = Loader::begin(destination).await?;
    match load(&mut loader, &snapshot, &dims).await {
        Ok(report) => {
            loader.commit().await?;
            info!(
                users = report.dimensions.users,
                content = report.dimensions.content,
                dates = report.dimensions.dates,
                plans = report.dimensions.plans,
                viewings = report.facts.viewings,
                subscriptions = report.facts.subscriptions,
                interactions = report.facts.interactions,
                skipped_subscriptions = report.skipped_subscriptions.len(),
                "ETL process completed successfully"
            );
            Ok(report)
        }
        Err(e) => {
            // A failed rollback is the partially-refreshed case
            error!("ETL load failed, rolling back destination: {}", e);
            if let Err(rollback_err) = loader.rollback().await {
                error!(
                    "CRITICAL: rollback failed, destination may be partially refreshed: {}",
                    rollback_err
                );
            }
            Err(e)
        }
    }
}

/// Steps 1-5 of the refresh, inside the loader's transaction
async fn load(
    loader: &mut Loader,
    snapshot: &SourceSnapshot,
    dims: &DimensionSet,
) -> Result<RunReport> {
    // Steps 1-2: children before parents
    loader.clear().await?;

    // Steps 3-4: every dimension row, then the store-assigned plan keys
    info!(stage = %Stage::LoadDimensions, "Loading dimensions");
    let (plans, dimensions) = loader.load_dimensions(dims).await?;

    // Plan keys only exist now, so fact building waits until here
    info!(stage = %Stage::BuildFacts, "Transforming facts");
    let facts = build_facts(snapshot, &plans)?;

    // Step 5
    info!(stage = %Stage::LoadFacts, "Loading facts");
    let fact_counts = loader.load_facts(&facts).await?;

    Ok(RunReport {
        dimensions,
        facts: fact_counts,
        skipped_subscriptions: facts.skipped_subscriptions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Extract.to_string(), "extract");
        assert_eq!(Stage::LoadDimensions.to_string(), "load-dimensions");
        assert_eq!(Stage::LoadFacts.to_string(), "load-facts");
    }
}
