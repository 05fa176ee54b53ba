//! Fact Builder
//!
//! Turns every source event into exactly one fact row with its foreign keys
//! resolved. Dates go through the same key derivation as the date dimension;
//! plans go through the [`PlanLookup`] read back from the destination store.

use crate::dimensions::{event_date_key, PlanLookup};
use crate::extract::SourceSnapshot;
use sdw_common::db::{FactSubscriptionTransaction, FactUserInteraction, FactViewingActivity};
use sdw_common::Result;
use serde::Serialize;
use tracing::{info, warn};

/// Interaction kinds recorded in the source log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Rating,
    AddToList,
    Other,
}

impl InteractionKind {
    /// Recognise `RATING` / `ADD_TO_LIST`, ignoring case and treating spaces,
    /// hyphens and underscores alike. Anything else is `Other`.
    pub fn parse(raw: Option<&str>) -> Self {
        let normalized: String = raw
            .unwrap_or_default()
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "RATING" => InteractionKind::Rating,
            "ADD_TO_LIST" => InteractionKind::AddToList,
            _ => InteractionKind::Other,
        }
    }
}

/// A subscription event left out of the fact table because its plan has no key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSubscription {
    pub source_id: i64,
    pub plan_name: Option<String>,
}

/// Fact rows ready to be written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactSet {
    pub viewings: Vec<FactViewingActivity>,
    pub subscriptions: Vec<FactSubscriptionTransaction>,
    pub interactions: Vec<FactUserInteraction>,
    pub skipped_subscriptions: Vec<SkippedSubscription>,
}

/// Build all fact rows. `plans` must come from the plan rows already loaded.
pub fn build_facts(snapshot: &SourceSnapshot, plans: &PlanLookup) -> Result<FactSet> {
    let viewings = snapshot
        .viewings
        .iter()
        .map(|v| {
            let key = event_date_key("viewings", v.id, v.view_date.as_deref())?;
            Ok(FactViewingActivity {
                date_id: key.date_id,
                user_id: v.user_id,
                content_id: v.content_id,
                duration_watched_minutes: v.duration_watched_minutes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut subscriptions = Vec::with_capacity(snapshot.subscriptions.len());
    let mut skipped_subscriptions = Vec::new();
    for s in &snapshot.subscriptions {
        let key = event_date_key("subscriptions", s.id, s.event_date.as_deref())?;

        let plan_id = s.plan_name.as_deref().and_then(|name| plans.get(name));
        let Some(plan_id) = plan_id else {
            warn!(
                "Skipping subscription event id={}: plan {:?} has no DimSubscriptionPlan key",
                s.id, s.plan_name
            );
            skipped_subscriptions.push(SkippedSubscription {
                source_id: s.id,
                plan_name: s.plan_name.clone(),
            });
            continue;
        };

        subscriptions.push(FactSubscriptionTransaction {
            date_id: key.date_id,
            user_id: s.user_id,
            plan_id,
            transaction_amount: s.amount,
        });
    }

    let interactions = snapshot
        .interactions
        .iter()
        .map(|i| {
            let key = event_date_key("interactions", i.id, i.interaction_date.as_deref())?;
            let kind = InteractionKind::parse(i.interaction_type.as_deref());
            Ok(FactUserInteraction {
                date_id: key.date_id,
                user_id: i.user_id,
                content_id: i.content_id,
                rating_value: match kind {
                    InteractionKind::Rating => i.rating_value.unwrap_or(0),
                    _ => 0,
                },
                is_added_to_list: kind == InteractionKind::AddToList,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Built facts: {} viewings, {} subscriptions ({} skipped), {} interactions",
        viewings.len(),
        subscriptions.len(),
        skipped_subscriptions.len(),
        interactions.len()
    );

    Ok(FactSet {
        viewings,
        subscriptions,
        interactions,
        skipped_subscriptions,
    })
}
