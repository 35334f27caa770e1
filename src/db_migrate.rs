use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trainerbook_db::{schema::initialize_database, seed::seed_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Get database connection string from environment variable
    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = trainerbook_db::create_pool(&database_url).await?;

    initialize_database(&db_pool).await?;

    // Load seed data into an empty table
    if let Ok(seed_file) = std::env::var("SEED_FILE") {
        let inserted = seed_database(&db_pool, &PathBuf::from(seed_file)).await?;
        info!("Seed complete: {} appointments inserted", inserted);
    }

    Ok(())
}
