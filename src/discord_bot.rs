use color_eyre::eyre::Result;
use cozy_discord_bot::config::BotConfig;
use cozy_log_parser::{
    config::{has_any_role, in_channels},
    ParserSettings, PipelineConfig,
};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = BotConfig::from_env()?;
    let settings = ParserSettings::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Cozy Discord bot");

    let pipeline = PipelineConfig::from_settings(&settings)?
        .with_global_predicate(in_channels(config.log_channel_ids.clone()))
        .with_staff_predicate(has_any_role(config.staff_role_ids.clone()))
        .build()?;

    // Start the Discord bot
    match cozy_discord_bot::start_bot(config, pipeline).await {
        Ok(_) => info!("Discord bot shut down gracefully"),
        Err(e) => error!("Discord bot error: {}", e),
    }

    Ok(())
}
