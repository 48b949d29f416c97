use std::time::Duration;

use sqlx::{Pool, Postgres};

use crate::bootstrap::config::Config;

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(cfg: &Config) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&cfg.database_url)
        .await?;
    Ok(pool)
}

/// Runs the compile-time embedded migrations under ./migrations.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub mod repositories;
