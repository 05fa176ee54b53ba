//! sdw-etl library - batch ETL from the transactional store into the star schema
//!
//! Each run is a full refresh: extract every source table, rebuild all
//! dimensions, then rebuild all facts against them.

pub mod dimensions;
pub mod extract;
pub mod facts;
pub mod loader;
pub mod pipeline;
pub mod seed;

pub use pipeline::{run, run_job, RunReport, Stage};
