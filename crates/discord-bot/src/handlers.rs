use cozy_log_parser::Pipeline;
use serenity::{
    async_trait,
    model::{
        application::{
            command::Command,
            interaction::{Interaction, InteractionResponseType},
        },
        channel::Message,
        gateway::Ready,
        id::GuildId,
    },
    prelude::*,
};
use std::sync::Arc;
use tracing::{debug, error, info};

pub mod parse_logs;

use crate::commands::parse_logs::PARSE_LOGS;
use crate::config::BotConfig;

/// Main Discord handler that processes all events.
///
/// Every message is offered to the log pipeline; the "Parse Logs" context
/// command runs it on demand.
pub struct Handler {
    config: BotConfig,
    pipeline: Arc<Pipeline>,
}

impl Handler {
    /// Create a new handler
    pub fn new(config: BotConfig, pipeline: Arc<Pipeline>) -> Self {
        Self { config, pipeline }
    }

    fn context(&self, ctx: &Context) -> HandlerContext {
        HandlerContext {
            ctx: ctx.clone(),
            config: self.config.clone(),
            pipeline: self.pipeline.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        // Guild commands show up immediately, global ones are cached by Discord
        if let Some(test_guild_id) = self.config.test_guild_id {
            match GuildId(test_guild_id)
                .set_application_commands(&ctx.http, |commands| {
                    crate::commands::register_commands(commands)
                })
                .await
            {
                Ok(cmds) => {
                    info!("Guild commands registered for {}! Total commands: {}", test_guild_id, cmds.len());
                }
                Err(why) => {
                    error!("Error registering guild commands: {:?}", why);
                }
            }
        }

        match Command::set_global_application_commands(&ctx.http, |commands| {
            crate::commands::register_commands(commands)
        })
        .await
        {
            Ok(cmds) => {
                info!("Global commands registered successfully! Total commands: {}", cmds.len());
                for cmd in cmds {
                    info!("Command registered: {}", cmd.name);
                }
            }
            Err(why) => {
                error!("Error registering global commands: {:?}", why);
            }
        }
    }

    /// Passive log analysis of every message the pipeline accepts
    async fn message(&self, ctx: Context, msg: Message) {
        if let Err(e) = parse_logs::handle_message(self.context(&ctx), &msg).await {
            error!("Error analysing message {}: {:?}", msg.id, e);
        }
    }

    /// Handle interactions (context menu commands)
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };
        info!("Received command: {}", command.data.name);

        let result = match command.data.name.as_str() {
            PARSE_LOGS => parse_logs::handle_parse_logs_command(self.context(&ctx), &command).await,
            _ => {
                debug!("Unknown command: {}", command.data.name);
                Err(eyre::eyre!("Unknown command"))
            }
        };

        if let Err(e) = result {
            error!("Error handling command: {:?}", e);

            // The response may already be deferred, so try both
            let replied = command
                .edit_original_interaction_response(&ctx.http, |m| m.content(format!("Error: {}", e)))
                .await;

            if replied.is_err() {
                if let Err(why) = command
                    .create_interaction_response(&ctx.http, |r| {
                        r.kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|m| {
                                m.content(format!("Error: {}", e)).ephemeral(true)
                            })
                    })
                    .await
                {
                    error!("Failed to send error response: {:?}", why);
                }
            }
        }
    }
}

/// Shared context for event and command handlers.
pub struct HandlerContext {
    pub ctx: Context,
    pub config: BotConfig,
    pub pipeline: Arc<Pipeline>,
}
