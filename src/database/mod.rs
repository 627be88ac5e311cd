use std::sync::OnceLock;

use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod transaction;
pub mod utils;

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Connect, run migrations and install the process-wide pool.
pub async fn init_database(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    POOL.set(pool.clone()).ok();

    Ok(pool)
}

/// The process-wide pool. `init_database` must have run first.
pub fn get_pool() -> PgPool {
    POOL.get()
        .expect("database pool accessed before init_database")
        .clone()
}
