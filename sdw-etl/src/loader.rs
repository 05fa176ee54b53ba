//! Loader: full-refresh writes to the destination store
//!
//! All writes of one run go through a single transaction:
//! 1. delete fact rows (children first)
//! 2. delete dimension rows
//! 3. insert dimension rows
//! 4. read back DimSubscriptionPlan keys
//! 5. insert fact rows
//!
//! Nothing is visible to readers until [`Loader::commit`]. Dropping a loader
//! without committing rolls the whole sequence back.

use crate::dimensions::{DimensionSet, PlanLookup};
use crate::facts::FactSet;
use sdw_common::db::{DimSubscriptionPlan, DIMENSION_TABLES, FACT_TABLES};
use sdw_common::{Error, Result};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

/// Rows written per dimension table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DimensionCounts {
    pub users: usize,
    pub content: usize,
    pub dates: usize,
    pub plans: usize,
}

/// Rows written per fact table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FactCounts {
    pub viewings: usize,
    pub subscriptions: usize,
    pub interactions: usize,
}

/// An open full-refresh load against the destination store
pub struct Loader {
    tx: Transaction<'static, Sqlite>,
}

impl Loader {
    /// Begin the load transaction
    pub async fn begin(destination: &SqlitePool) -> Result<Self> {
        let tx = destination.begin().await.map_err(Error::load("begin"))?;
        Ok(Self { tx })
    }

    /// Delete every fact row, then every dimension row
    ///
    /// The DimSubscriptionPlan key sequence is reset as well, so an unchanged
    /// source reproduces the same plan ids on every run.
    pub async fn clear(&mut self) -> Result<()> {
        info!("Clearing destination tables");

        // Facts reference dimensions, so they go first
        for (table, _) in FACT_TABLES.iter().chain(DIMENSION_TABLES) {
            let deleted = sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *self.tx)
                .await
                .map_err(Error::load("clear"))?
                .rows_affected();
            debug!("Deleted {} rows from {}", deleted, table);
        }

        // AUTOINCREMENT keeps counting across deletes unless its sequence row is cleared
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'DimSubscriptionPlan'")
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("clear"))?;

        Ok(())
    }

    /// Insert all dimension rows and return the plan lookup read back from the store
    pub async fn load_dimensions(
        &mut self,
        dims: &DimensionSet,
    ) -> Result<(PlanLookup, DimensionCounts)> {
        info!("Loading DimUser");
        for user in &dims.users {
            sqlx::query(
                "INSERT INTO DimUser (user_id, fullName, email, joinDate) VALUES (?, ?, ?, ?)",
            )
            .bind(user.user_id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.join_date)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("DimUser"))?;
        }

        info!("Loading DimContent");
        for item in &dims.content {
            sqlx::query(
                r#"
                INSERT INTO DimContent (content_id, title, type, mainGenre, releaseYear)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.content_id)
            .bind(&item.title)
            .bind(&item.content_type)
            .bind(&item.main_genre)
            .bind(item.release_year)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("DimContent"))?;
        }

        // dates are unique by construction; the PRIMARY KEY rejects anything else
        info!("Loading DimDate");
        for date in &dims.dates {
            sqlx::query(
                r#"
                INSERT INTO DimDate (date_id, fullDate, year, quarter, month, dayOfWeek)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(date.date_id)
            .bind(&date.full_date)
            .bind(date.year)
            .bind(date.quarter)
            .bind(date.month)
            .bind(date.day_of_week)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("DimDate"))?;
        }

        // plan_id is left to the store; it is read back below
        info!("Loading DimSubscriptionPlan");
        for plan in &dims.plan_names {
            sqlx::query("INSERT INTO DimSubscriptionPlan (planName) VALUES (?)")
                .bind(plan)
                .execute(&mut *self.tx)
                .await
                .map_err(Error::load("DimSubscriptionPlan"))?;
        }

        // Facts must not be built before this lookup exists
        let plans = self.read_plan_keys().await?;

        let counts = DimensionCounts {
            users: dims.users.len(),
            content: dims.content.len(),
            dates: dims.dates.len(),
            plans: plans.len(),
        };
        Ok((plans, counts))
    }

    /// Read the store-assigned plan keys back inside the load transaction
    async fn read_plan_keys(&mut self) -> Result<PlanLookup> {
        // Same transaction, so the uncommitted inserts are visible here
        let rows = sqlx::query_as::<_, DimSubscriptionPlan>(
            "SELECT plan_id, planName FROM DimSubscriptionPlan ORDER BY plan_id",
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(Error::load("read plan keys"))?;

        debug!("Read back {} plan keys", rows.len());
        Ok(PlanLookup::from_rows(rows))
    }

    /// Insert all fact rows; every referenced dimension row must already be loaded
    pub async fn load_facts(&mut self, facts: &FactSet) -> Result<FactCounts> {
        // Foreign keys are enforced per statement: a dangling key fails here
        info!("Loading Fact_ViewingActivity");
        for v in &facts.viewings {
            sqlx::query(
                r#"
                INSERT INTO Fact_ViewingActivity (date_id, user_id, content_id, durationWatchedMinutes)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(v.date_id)
            .bind(v.user_id)
            .bind(v.content_id)
            .bind(v.duration_watched_minutes)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("Fact_ViewingActivity"))?;
        }

        info!("Loading Fact_SubscriptionTransaction");
        for s in &facts.subscriptions {
            sqlx::query(
                r#"
                INSERT INTO Fact_SubscriptionTransaction (date_id, user_id, plan_id, transactionAmount)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(s.date_id)
            .bind(s.user_id)
            .bind(s.plan_id)
            .bind(s.transaction_amount)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("Fact_SubscriptionTransaction"))?;
        }

        info!("Loading Fact_UserInteraction");
        for i in &facts.interactions {
            sqlx::query(
                r#"
                INSERT INTO Fact_UserInteraction (date_id, user_id, content_id, ratingValue, isAddedToList)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(i.date_id)
            .bind(i.user_id)
            .bind(i.content_id)
            .bind(i.rating_value)
            .bind(i.is_added_to_list)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::load("Fact_UserInteraction"))?;
        }

        Ok(FactCounts {
            viewings: facts.viewings.len(),
            subscriptions: facts.subscriptions.len(),
            interactions: facts.interactions.len(),
        })
    }

    /// Make the whole refresh visible
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(Error::load("commit"))
    }

    /// Abandon the refresh, restoring the pre-run state
    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.map_err(Error::load("rollback"))
    }
}
