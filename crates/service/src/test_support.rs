#![cfg(test)]
use std::path::PathBuf;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Fresh in-memory database with migrations applied. Each call returns an
/// isolated database; `connect_to` pins the pool to a single connection so
/// the schema is shared across all statements of a test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_to("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Isolated uploads directory for one test run.
pub fn temp_uploads_dir() -> PathBuf {
    let dir = PathBuf::from("target")
        .join("test-data")
        .join(Uuid::new_v4().to_string());
    std::fs::create_dir_all(&dir).expect("create test uploads dir");
    dir
}
