use crate::adapters::persistence::PostgresPersistence;
use crate::infra::db::init_db;

pub mod app;
pub mod config;
pub mod db;
pub mod jwks;
pub mod setup;

pub async fn postgres_persistence(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<PostgresPersistence> {
    let pool = init_db(database_url, max_connections).await?;
    Ok(PostgresPersistence::new(pool))
}
