//! Database models
//!
//! Source rows mirror the transactional tables column for column. Dimension
//! and fact rows carry the star-schema attribute names via `sqlx(rename)` so
//! they can be read straight back out of the destination store.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Source store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub join_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Content {
    pub id: i64,
    pub title: String,
    pub genre: Option<String>,
    pub release_year: Option<i64>,
    #[sqlx(rename = "type")]
    pub content_type: Option<String>,
}

/// One viewing event; append-only, no natural dedup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Viewing {
    pub id: i64,
    pub user_id: Option<i64>,
    pub content_id: Option<i64>,
    pub view_date: Option<String>,
    pub duration_watched_minutes: Option<f64>,
    pub device: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Interaction {
    pub id: i64,
    pub user_id: Option<i64>,
    pub content_id: Option<i64>,
    pub interaction_date: Option<String>,
    pub interaction_type: Option<String>,
    pub rating_value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SubscriptionEvent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub event_date: Option<String>,
    pub plan_name: Option<String>,
    pub event_type: Option<String>,
    pub amount: Option<f64>,
}

// ---------------------------------------------------------------------------
// Destination store: dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DimUser {
    pub user_id: i64,
    #[sqlx(rename = "fullName")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[sqlx(rename = "joinDate")]
    pub join_date: Option<String>,
}

impl From<&User> for DimUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            full_name: Some(user.full_name.clone()),
            email: user.email.clone(),
            join_date: user.join_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DimContent {
    pub content_id: i64,
    pub title: Option<String>,
    #[sqlx(rename = "type")]
    pub content_type: Option<String>,
    #[sqlx(rename = "mainGenre")]
    pub main_genre: Option<String>,
    #[sqlx(rename = "releaseYear")]
    pub release_year: Option<i64>,
}

impl From<&Content> for DimContent {
    fn from(content: &Content) -> Self {
        Self {
            content_id: content.id,
            title: Some(content.title.clone()),
            content_type: content.content_type.clone(),
            main_genre: content.genre.clone(),
            release_year: content.release_year,
        }
    }
}

/// DimDate row as stored; built from [`crate::DateKey`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DimDate {
    pub date_id: i64,
    #[sqlx(rename = "fullDate")]
    pub full_date: String,
    pub year: i64,
    pub quarter: i64,
    pub month: i64,
    #[sqlx(rename = "dayOfWeek")]
    pub day_of_week: i64,
}

impl From<&crate::DateKey> for DimDate {
    fn from(key: &crate::DateKey) -> Self {
        Self {
            date_id: key.date_id,
            full_date: key.full_date_string(),
            year: i64::from(key.year),
            quarter: i64::from(key.quarter),
            month: i64::from(key.month),
            day_of_week: i64::from(key.day_of_week),
        }
    }
}

/// Plan row; `plan_id` is assigned by the destination store on insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DimSubscriptionPlan {
    pub plan_id: i64,
    #[sqlx(rename = "planName")]
    pub plan_name: String,
}

// ---------------------------------------------------------------------------
// Destination store: facts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FactViewingActivity {
    pub date_id: i64,
    pub user_id: Option<i64>,
    pub content_id: Option<i64>,
    #[sqlx(rename = "durationWatchedMinutes")]
    pub duration_watched_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FactSubscriptionTransaction {
    pub date_id: i64,
    pub user_id: Option<i64>,
    pub plan_id: i64,
    #[sqlx(rename = "transactionAmount")]
    pub transaction_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FactUserInteraction {
    pub date_id: i64,
    pub user_id: Option<i64>,
    pub content_id: Option<i64>,
    #[sqlx(rename = "ratingValue")]
    pub rating_value: i64,
    #[sqlx(rename = "isAddedToList")]
    pub is_added_to_list: bool,
}
