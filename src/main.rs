use anyhow::Result;
use smarttravel::{AppState, SmartTravelConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = SmartTravelConfig::load()?;
    logging::init(&config.logging)?;
    tracing::info!("Starting smarttravel {}", smarttravel::VERSION);

    let state = AppState::from_config(&config)?;
    web::run(&config, state).await
}
