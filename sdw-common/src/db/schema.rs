//! Source and destination DDL
//!
//! The source store is the normalized transactional schema (five tables);
//! the destination store is the star schema (four dimensions, three facts).

use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Source tables in creation order
pub const SOURCE_TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            full_name TEXT NOT NULL,
            email TEXT UNIQUE,
            join_date TEXT
        )
        "#,
    ),
    (
        "content",
        r#"
        CREATE TABLE IF NOT EXISTS content (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            genre TEXT,
            release_year INTEGER,
            type TEXT
        )
        "#,
    ),
    (
        "viewings",
        r#"
        CREATE TABLE IF NOT EXISTS viewings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            content_id INTEGER,
            view_date TEXT,
            duration_watched_minutes INTEGER,
            device TEXT
        )
        "#,
    ),
    (
        "interactions",
        r#"
        CREATE TABLE IF NOT EXISTS interactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            content_id INTEGER,
            interaction_date TEXT,
            interaction_type TEXT,
            rating_value INTEGER
        )
        "#,
    ),
    (
        "subscriptions",
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            event_date TEXT,
            plan_name TEXT,
            event_type TEXT,
            amount REAL
        )
        "#,
    ),
];

/// Dimension tables in creation order
pub const DIMENSION_TABLES: &[(&str, &str)] = &[
    (
        "DimUser",
        r#"
        CREATE TABLE IF NOT EXISTS DimUser (
            user_id INTEGER PRIMARY KEY,
            fullName TEXT,
            email TEXT,
            joinDate TEXT
        )
        "#,
    ),
    (
        "DimContent",
        r#"
        CREATE TABLE IF NOT EXISTS DimContent (
            content_id INTEGER PRIMARY KEY,
            title TEXT,
            type TEXT,
            mainGenre TEXT,
            releaseYear INTEGER
        )
        "#,
    ),
    (
        "DimDate",
        r#"
        CREATE TABLE IF NOT EXISTS DimDate (
            date_id INTEGER PRIMARY KEY,
            fullDate TEXT,
            year INTEGER,
            quarter INTEGER,
            month INTEGER,
            dayOfWeek INTEGER
        )
        "#,
    ),
    (
        "DimSubscriptionPlan",
        r#"
        CREATE TABLE IF NOT EXISTS DimSubscriptionPlan (
            plan_id INTEGER PRIMARY KEY AUTOINCREMENT,
            planName TEXT UNIQUE
        )
        "#,
    ),
];

/// Fact tables in creation order (after the dimensions they reference)
pub const FACT_TABLES: &[(&str, &str)] = &[
    (
        "Fact_ViewingActivity",
        r#"
        CREATE TABLE IF NOT EXISTS Fact_ViewingActivity (
            viewing_id INTEGER PRIMARY KEY,
            date_id INTEGER,
            user_id INTEGER,
            content_id INTEGER,
            durationWatchedMinutes REAL,
            FOREIGN KEY(date_id) REFERENCES DimDate(date_id),
            FOREIGN KEY(user_id) REFERENCES DimUser(user_id),
            FOREIGN KEY(content_id) REFERENCES DimContent(content_id)
        )
        "#,
    ),
    (
        "Fact_SubscriptionTransaction",
        r#"
        CREATE TABLE IF NOT EXISTS Fact_SubscriptionTransaction (
            transaction_id INTEGER PRIMARY KEY,
            date_id INTEGER,
            user_id INTEGER,
            plan_id INTEGER,
            transactionAmount REAL,
            FOREIGN KEY(date_id) REFERENCES DimDate(date_id),
            FOREIGN KEY(user_id) REFERENCES DimUser(user_id),
            FOREIGN KEY(plan_id) REFERENCES DimSubscriptionPlan(plan_id)
        )
        "#,
    ),
    (
        "Fact_UserInteraction",
        r#"
        CREATE TABLE IF NOT EXISTS Fact_UserInteraction (
            interaction_id INTEGER PRIMARY KEY,
            date_id INTEGER,
            user_id INTEGER,
            content_id INTEGER,
            ratingValue INTEGER,
            isAddedToList INTEGER,
            FOREIGN KEY(date_id) REFERENCES DimDate(date_id),
            FOREIGN KEY(user_id) REFERENCES DimUser(user_id),
            FOREIGN KEY(content_id) REFERENCES DimContent(content_id)
        )
        "#,
    ),
];

/// Create any missing source tables (idempotent)
pub async fn create_source_schema(pool: &SqlitePool) -> Result<()> {
    for (_, ddl) in SOURCE_TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Create any missing destination tables (idempotent)
pub async fn create_destination_schema(pool: &SqlitePool) -> Result<()> {
    for (_, ddl) in DIMENSION_TABLES.iter().chain(FACT_TABLES) {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Drop and recreate every source table
pub async fn reset_source_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (name, _) in SOURCE_TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", name))
            .execute(&mut *tx)
            .await?;
    }
    for (_, ddl) in SOURCE_TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Recreated {} source tables", SOURCE_TABLES.len());
    Ok(())
}

/// Drop and recreate every destination table, facts dropped first
pub async fn reset_destination_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (name, _) in FACT_TABLES.iter().rev().chain(DIMENSION_TABLES.iter().rev()) {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", name))
            .execute(&mut *tx)
            .await?;
    }
    for (_, ddl) in DIMENSION_TABLES.iter().chain(FACT_TABLES) {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(
        "Recreated {} dimension and {} fact tables",
        DIMENSION_TABLES.len(),
        FACT_TABLES.len()
    );
    Ok(())
}
