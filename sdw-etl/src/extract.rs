//! Extractor: full-table snapshots of the source store
//!
//! The five reads are independent of each other. Rows are ordered by primary
//! key so that downstream surrogate assignment is reproducible.

use sdw_common::db::{Content, Interaction, SubscriptionEvent, User, Viewing};
use sdw_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// One consistent read of every source table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSnapshot {
    pub users: Vec<User>,
    pub content: Vec<Content>,
    pub viewings: Vec<Viewing>,
    pub interactions: Vec<Interaction>,
    pub subscriptions: Vec<SubscriptionEvent>,
}

/// Read full snapshots of the five source tables
pub async fn extract(source: &SqlitePool) -> Result<SourceSnapshot> {
    info!("Extracting source tables");

    let users = sqlx::query_as::<_, User>(
        "SELECT id, full_name, email, join_date FROM users ORDER BY id",
    )
    .fetch_all(source)
    .await
    .map_err(Error::extraction("users"))?;
    debug!("Extracted {} users", users.len());

    let content = sqlx::query_as::<_, Content>(
        "SELECT id, title, genre, release_year, type FROM content ORDER BY id",
    )
    .fetch_all(source)
    .await
    .map_err(Error::extraction("content"))?;
    debug!("Extracted {} content items", content.len());

    // SQLite keeps 30.5 as REAL even in an INTEGER column; read every duration as REAL
    let viewings = sqlx::query_as::<_, Viewing>(
        r#"
        SELECT id, user_id, content_id, view_date,
               CAST(duration_watched_minutes AS REAL) AS duration_watched_minutes,
               device
        FROM viewings
        ORDER BY id
        "#,
    )
    .fetch_all(source)
    .await
    .map_err(Error::extraction("viewings"))?;
    debug!("Extracted {} viewings", viewings.len());

    let interactions = sqlx::query_as::<_, Interaction>(
        r#"
        SELECT id, user_id, content_id, interaction_date, interaction_type, rating_value
        FROM interactions
        ORDER BY id
        "#,
    )
    .fetch_all(source)
    .await
    .map_err(Error::extraction("interactions"))?;
    debug!("Extracted {} interactions", interactions.len());

    let subscriptions = sqlx::query_as::<_, SubscriptionEvent>(
        r#"
        SELECT id, user_id, event_date, plan_name, event_type, amount
        FROM subscriptions
        ORDER BY id
        "#,
    )
    .fetch_all(source)
    .await
    .map_err(Error::extraction("subscriptions"))?;
    debug!("Extracted {} subscription events", subscriptions.len());

    Ok(SourceSnapshot {
        users,
        content,
        viewings,
        interactions,
        subscriptions,
    })
}
