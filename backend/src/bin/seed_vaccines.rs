//! Administrative seed: install the built-in default vaccine schedule.
//!
//! Replaces any existing default definitions; catalog entries added by
//! admins with isDefault=false are left alone.
//!
//! Usage: DATABASE_URL=sqlite:maternal_care.db seed_vaccines

use std::sync::Arc;
use tracing::info;

use maternal_care_backend::db::DbConnection;
use maternal_care_backend::domain::CatalogService;
use maternal_care_backend::storage::sqlite::SqliteVaccineRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:maternal_care.db".into());

    info!("Connecting to {}", database_url);
    let db = DbConnection::new(&database_url).await?;

    let service = CatalogService::new(Arc::new(SqliteVaccineRepository::new(db)));
    let seeded = service.seed_defaults().await?;

    info!("Default vaccines seeded successfully ({} entries)", seeded);
    Ok(())
}
