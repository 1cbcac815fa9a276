use cozy_log_parser::Pipeline;
use eyre::Result;
use serenity::{Client, prelude::GatewayIntents};
use std::sync::Arc;
use tracing::info;

pub mod commands;
pub mod config;
pub mod handlers;

/// Start the Discord bot with the provided configuration and log pipeline.
///
/// Runs until the bot disconnects or an error occurs.
///
/// # Arguments
///
/// * `config` - The bot configuration containing token, application ID, etc.
/// * `pipeline` - The built log pipeline shared by every event handler
///
/// # Returns
///
/// * `Ok(())` if the bot shut down gracefully
/// * `Err` if an error occurred during initialization or operation
pub async fn start_bot(config: config::BotConfig, pipeline: Pipeline) -> Result<()> {
    info!("Starting Discord bot");

    let handler = handlers::Handler::new(config.clone(), Arc::new(pipeline));

    // Reading attachments and links needs message content
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.token, intents)
        .application_id(config.application_id)
        .event_handler(handler)
        .await?;

    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}
