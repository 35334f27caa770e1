use color_eyre::eyre::Result;
use dotenv::dotenv;
use trainerbook_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize logging
    trainerbook_api::init_tracing(config.log_level)?;

    // Open appointment storage, creating schema and seed data as needed
    let repository = trainerbook_api::connect_repository(&config).await?;

    // Start API server
    trainerbook_api::start_server(config, repository).await?;

    Ok(())
}
