use hybrid_savings::config::CatalogConfig;
use hybrid_savings::store::SqliteStore;
use sqlx::SqlitePool;

pub const NISSAN: i64 = 4;
pub const KICKS: i64 = 16;

/// Fresh in-memory database with the bundled schema and seed data
pub async fn seeded_store() -> anyhow::Result<SqliteStore> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(SqliteStore::new(pool, CatalogConfig::default()))
}
