//! Database connection and schema tests

use sdw_common::db::{
    connect_destination, connect_source, open_source_for_write, reset_destination_schema,
    reset_source_schema, DIMENSION_TABLES, FACT_TABLES, SOURCE_TABLES,
};
use sdw_common::Error;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn table_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_destination_created_with_star_schema() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("destination.db");

    let pool = connect_destination(&db_path).await.unwrap();
    assert!(db_path.exists(), "Destination database file was not created");

    let tables = table_names(&pool).await;
    for (name, _) in DIMENSION_TABLES.iter().chain(FACT_TABLES) {
        assert!(tables.iter().any(|t| t == name), "Missing table {}", name);
    }
}

#[tokio::test]
async fn test_destination_open_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("destination.db");

    let first = connect_destination(&db_path).await.unwrap();
    sqlx::query("INSERT INTO DimSubscriptionPlan (planName) VALUES ('Premium')")
        .execute(&first)
        .await
        .unwrap();
    drop(first);

    let second = connect_destination(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM DimSubscriptionPlan")
        .fetch_one(&second)
        .await
        .unwrap();
    assert_eq!(count, 1, "Re-opening must not drop existing rows");
}

#[tokio::test]
async fn test_destination_enforces_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let pool = connect_destination(&dir.path().join("destination.db"))
        .await
        .unwrap();

    let result = sqlx::query(
        "INSERT INTO Fact_ViewingActivity (date_id, user_id, content_id, durationWatchedMinutes)
         VALUES (20250901, 1, 1, 10.0)",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "Dangling fact keys must be rejected");
}

#[tokio::test]
async fn test_missing_source_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = connect_source(&dir.path().join("missing.db")).await;

    assert!(matches!(result, Err(Error::NotFound(_))));
    assert!(!dir.path().join("missing.db").exists(), "Must not create the source");
}

#[tokio::test]
async fn test_source_connection_is_read_only() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("source.db");
    drop(open_source_for_write(&db_path).await.unwrap());

    let pool = connect_source(&db_path).await.unwrap();
    let write = sqlx::query("INSERT INTO users (id, full_name) VALUES (1, 'Grace')")
        .execute(&pool)
        .await;
    assert!(write.is_err(), "Source connection must be read-only");
}

#[tokio::test]
async fn test_reset_schemas_recreate_all_tables() {
    let dir = TempDir::new().unwrap();

    let source = open_source_for_write(&dir.path().join("source.db")).await.unwrap();
    sqlx::query("INSERT INTO users (id, full_name) VALUES (1, 'Grace')")
        .execute(&source)
        .await
        .unwrap();
    reset_source_schema(&source).await.unwrap();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&source)
        .await
        .unwrap();
    assert_eq!(users, 0);
    assert_eq!(table_names(&source).await.len(), SOURCE_TABLES.len());

    let destination = connect_destination(&dir.path().join("destination.db"))
        .await
        .unwrap();
    reset_destination_schema(&destination).await.unwrap();
    assert_eq!(
        table_names(&destination).await.len(),
        DIMENSION_TABLES.len() + FACT_TABLES.len()
    );
}
