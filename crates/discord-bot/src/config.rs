use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::env;
use tracing::Level;

/// Configuration for the Discord bot.
///
/// Everything the bot needs to connect to Discord and decide which messages
/// the log pipeline may look at.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Application ID for Discord bot (required)
    pub application_id: u64,
    /// Test guild ID for faster command registration during development
    pub test_guild_id: Option<u64>,
    /// Roles allowed to run "Parse Logs" on any message
    pub staff_role_ids: Vec<u64>,
    /// Channels watched for logs; empty means every channel
    pub log_channel_ids: Vec<u64>,
    /// Maximum tracing level (defaults to "info")
    pub log_level: Option<String>,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let token = env::var("DISCORD_TOKEN")
            .map_err(|_| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let application_id = env::var("DISCORD_APPLICATION_ID")
            .map_err(|_| eyre!("DISCORD_APPLICATION_ID environment variable not set"))?
            .parse::<u64>()
            .map_err(|_| eyre!("DISCORD_APPLICATION_ID must be a valid u64"))?;

        // Optional test guild ID for development
        let test_guild_id = env::var("DISCORD_TEST_GUILD_ID")
            .ok()
            .and_then(|id| id.parse::<u64>().ok());

        let staff_role_ids = parse_id_list(&env::var("DISCORD_STAFF_ROLE_IDS").unwrap_or_default())
            .wrap_err("DISCORD_STAFF_ROLE_IDS must be a comma separated list of ids")?;

        let log_channel_ids = parse_id_list(&env::var("DISCORD_LOG_CHANNEL_IDS").unwrap_or_default())
            .wrap_err("DISCORD_LOG_CHANNEL_IDS must be a comma separated list of ids")?;

        let log_level = env::var("LOG_LEVEL").ok();

        Ok(Self {
            token,
            application_id,
            test_guild_id,
            staff_role_ids,
            log_channel_ids,
            log_level,
        })
    }

    /// Get the tracing level (defaults to INFO if unset or unrecognised)
    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|level| level.trim().parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    }
}

/// Parses `"1, 2,3"` into ids. Blank entries are skipped.
pub fn parse_id_list(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .map_err(|_| eyre!("{} is not a valid id", id))
        })
        .collect()
}
