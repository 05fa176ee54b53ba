//! Sample data for the source store
//!
//! Ten users, six titles and a short September 2025 activity log. Used by
//! `sdw-etl seed` and as the end-to-end test fixture.

use sdw_common::db::SOURCE_TABLES;
use sdw_common::Result;
use sqlx::SqlitePool;
use tracing::info;

/// (id, full_name, email, join_date)
pub const USERS: &[(i64, &str, &str, &str)] = &[
    (101, "Grace", "grace@mail.com", "2024-01-10"),
    (102, "Erika", "erika@mail.com", "2024-02-15"),
    (103, "Nopi", "nopi@mail.com", "2024-03-20"),
    (104, "Ratna", "ratna@mail.com", "2024-04-25"),
    (105, "Abuk", "abuk@mail.com", "2024-05-01"),
    (106, "Amay", "amay@mail.com", "2024-06-05"),
    (107, "Iky", "iky@mail.com", "2024-07-10"),
    (108, "Iki", "iki@mail.com", "2024-08-15"),
    (109, "Randy", "randy@mail.com", "2024-09-20"),
    (110, "Affai", "affai@mail.com", "2024-10-01"),
];

/// (id, title, genre, release_year, type)
pub const CONTENT: &[(i64, &str, &str, i64, &str)] = &[
    (201, "Inception", "Sci-Fi", 2010, "Movie"),
    (202, "The Dark Knight", "Action", 2008, "Movie"),
    (203, "Parasite", "Thriller", 2019, "Movie"),
    (204, "Avengers: Endgame", "Action", 2019, "Movie"),
    (205, "Spirited Away", "Animation", 2001, "Movie"),
    (206, "Stranger Things", "Sci-Fi", 2016, "Series"),
];

/// (user_id, content_id, view_date, duration_watched_minutes, device)
pub const VIEWINGS: &[(i64, i64, &str, i64, &str)] = &[
    (101, 201, "2025-09-01 20:00:00", 148, "Smart TV"),
    (102, 206, "2025-09-01 21:00:00", 51, "Mobile"),
    (101, 202, "2025-09-02 20:00:00", 152, "Smart TV"),
    (105, 203, "2025-09-03 22:00:00", 132, "Web"),
    (109, 204, "2025-09-04 19:00:00", 181, "Smart TV"),
    (101, 206, "2025-09-04 21:00:00", 49, "Tablet"),
];

/// (user_id, content_id, interaction_date, interaction_type, rating_value)
pub const INTERACTIONS: &[(i64, i64, &str, &str, Option<i64>)] = &[
    (101, 201, "2025-09-01 22:30:00", "RATING", Some(1)),
    (102, 206, "2025-09-01 22:00:00", "ADD_TO_LIST", None),
    (105, 203, "2025-09-04 00:15:00", "RATING", Some(1)),
];

/// (user_id, event_date, plan_name, event_type, amount)
pub const SUBSCRIPTIONS: &[(i64, &str, &str, &str, f64)] = &[
    (101, "2025-09-01", "Premium", "RENEWAL", 186000.0),
    (102, "2025-09-01", "Standard", "RENEWAL", 120000.0),
    (110, "2025-09-01", "Basic", "NEW", 65000.0),
];

/// Replace the contents of the five source tables with the sample data
pub async fn seed_source(source: &SqlitePool) -> Result<()> {
    let mut tx = source.begin().await?;

    for (table, _) in SOURCE_TABLES.iter().rev() {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM sqlite_sequence")
        .execute(&mut *tx)
        .await?;

    for &(id, name, email, join_date) in USERS {
        sqlx::query("INSERT INTO users (id, full_name, email, join_date) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(join_date)
            .execute(&mut *tx)
            .await?;
    }

    for &(id, title, genre, year, kind) in CONTENT {
        sqlx::query(
            "INSERT INTO content (id, title, genre, release_year, type) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(genre)
        .bind(year)
        .bind(kind)
        .execute(&mut *tx)
        .await?;
    }

    for &(user_id, content_id, date, duration, device) in VIEWINGS {
        sqlx::query(
            r#"
            INSERT INTO viewings (user_id, content_id, view_date, duration_watched_minutes, device)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(content_id)
        .bind(date)
        .bind(duration)
        .bind(device)
        .execute(&mut *tx)
        .await?;
    }

    for &(user_id, content_id, date, kind, rating) in INTERACTIONS {
        sqlx::query(
            r#"
            INSERT INTO interactions (user_id, content_id, interaction_date, interaction_type, rating_value)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(content_id)
        .bind(date)
        .bind(kind)
        .bind(rating)
        .execute(&mut *tx)
        .await?;
    }

    for &(user_id, date, plan, kind, amount) in SUBSCRIPTIONS {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, event_date, plan_name, event_type, amount)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(plan)
        .bind(kind)
        .bind(amount)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        "Seeded source: {} users, {} content, {} viewings, {} interactions, {} subscriptions",
        USERS.len(),
        CONTENT.len(),
        VIEWINGS.len(),
        INTERACTIONS.len(),
        SUBSCRIPTIONS.len()
    );
    Ok(())
}
