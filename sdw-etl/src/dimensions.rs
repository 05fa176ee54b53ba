//! Dimension Builder
//!
//! Produces deduplicated dimension rows from a [`SourceSnapshot`]:
//! - DimUser / DimContent: one-to-one projections of the source rows
//! - DimDate: one row per distinct calendar day across the three event logs
//! - DimSubscriptionPlan: one row per distinct plan name, key assigned on insert
//!
//! The plan-name lookup is not built here; it only exists once the loader has
//! inserted the plans and read back their store-assigned keys.

use crate::extract::SourceSnapshot;
use sdw_common::db::{DimContent, DimDate, DimSubscriptionPlan, DimUser};
use sdw_common::{date_key, DateKey, Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Dimension rows ready to be written, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionSet {
    pub users: Vec<DimUser>,
    pub content: Vec<DimContent>,
    /// Ascending by `date_id`, each key exactly once
    pub dates: Vec<DimDate>,
    /// Distinct plan names in first-seen order
    pub plan_names: Vec<String>,
}

/// Resolve the date key of one event, naming the offending record on failure
pub fn event_date_key(table: &'static str, id: i64, raw: Option<&str>) -> Result<DateKey> {
    let raw = raw.ok_or_else(|| Error::InvalidRecord {
        stage: table,
        record: format!("id={}", id),
        reason: "missing event date".to_string(),
    })?;

    date_key(raw).map_err(|e| Error::InvalidRecord {
        stage: table,
        record: format!("id={}", id),
        reason: e.to_string(),
    })
}

/// Build every dimension from the snapshot
pub fn build_dimensions(snapshot: &SourceSnapshot) -> Result<DimensionSet> {
    let users: Vec<DimUser> = snapshot.users.iter().map(DimUser::from).collect();
    let content: Vec<DimContent> = snapshot.content.iter().map(DimContent::from).collect();
    let dates: Vec<DimDate> = collect_date_keys(snapshot)?
        .values()
        .map(DimDate::from)
        .collect();
    let plan_names = distinct_plan_names(snapshot);

    info!(
        "Built dimensions: {} users, {} content, {} dates, {} plans",
        users.len(),
        content.len(),
        dates.len(),
        plan_names.len()
    );

    Ok(DimensionSet {
        users,
        content,
        dates,
        plan_names,
    })
}

/// Distinct calendar days across viewings, interactions and subscription events
///
/// Keyed by `date_id`, so a day seen many times collapses to one entry.
pub fn collect_date_keys(snapshot: &SourceSnapshot) -> Result<BTreeMap<i64, DateKey>> {
    let mut keys = BTreeMap::new();

    for v in &snapshot.viewings {
        let key = event_date_key("viewings", v.id, v.view_date.as_deref())?;
        keys.insert(key.date_id, key);
    }
    for i in &snapshot.interactions {
        let key = event_date_key("interactions", i.id, i.interaction_date.as_deref())?;
        keys.insert(key.date_id, key);
    }
    for s in &snapshot.subscriptions {
        let key = event_date_key("subscriptions", s.id, s.event_date.as_deref())?;
        keys.insert(key.date_id, key);
    }

    debug!("Collected {} distinct dates", keys.len());
    Ok(keys)
}

/// Distinct plan names in the order they first appear
///
/// Events without a plan name contribute nothing; their facts surface later
/// as referential gaps.
pub fn distinct_plan_names(snapshot: &SourceSnapshot) -> Vec<String> {
    let mut seen = HashSet::new();
    snapshot
        .subscriptions
        .iter()
        .filter_map(|s| s.plan_name.as_deref())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Plan name -> store-assigned `plan_id`, read back after the plans are inserted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanLookup {
    ids: HashMap<String, i64>,
}

impl PlanLookup {
    pub fn from_rows(rows: impl IntoIterator<Item = DimSubscriptionPlan>) -> Self {
        Self {
            ids: rows
                .into_iter()
                .map(|row| (row.plan_name, row.plan_id))
                .collect(),
        }
    }

    pub fn get(&self, plan_name: &str) -> Option<i64> {
        self.ids.get(plan_name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
