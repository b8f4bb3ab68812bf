use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use once_cell::sync::Lazy;
use std::env;

pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }
    // Fall back to config.toml, then the bundled default
    if let Ok(cfg) = configs::load_default() {
        if !cfg.database.url.trim().is_empty() {
            return cfg.database.url;
        }
    }
    "sqlite://data/journal.db?mode=rwc".to_string()
});

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    connect_to(DATABASE_URL.as_str()).await
}

/// Connect to an explicit database URL. Used by tests with `sqlite::memory:`,
/// where every pooled connection is its own database, so the pool is pinned
/// to a single connection.
pub async fn connect_to(url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(url.to_string());
    opts.sqlx_logging(false);
    if url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;
    Ok(db)
}
