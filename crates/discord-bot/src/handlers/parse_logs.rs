use cozy_core::models::{Attachment, Author, MessageEvent};
use cozy_log_parser::Report;
use eyre::{eyre, Result};
use serenity::{
    builder::CreateEmbed,
    model::{
        application::interaction::{
            application_command::ApplicationCommandInteraction, InteractionResponseType,
        },
        channel::Message,
        guild::{Member, PartialMember},
        user::User,
    },
    utils::Color,
};
use tracing::{debug, info};

use crate::handlers::HandlerContext;

pub const NOT_ALLOWED: &str = "You can't parse logs from this message.";
pub const NOTHING_FOUND: &str = "No logs found in this message.";

/// Reply to a message with the report for any logs it links or attaches.
pub async fn handle_message(ctx: HandlerContext, msg: &Message) -> Result<()> {
    let event = message_event(msg);

    let Some(report) = ctx.pipeline.handle_event(&event).await else {
        return Ok(());
    };
    if report.is_empty() {
        debug!("Nothing to report for message {}", msg.id);
        return Ok(());
    }

    info!("Replying to message {} with {} log reports", msg.id, report.logs.len());
    msg.channel_id
        .send_message(&ctx.ctx.http, |m| {
            m.reference_message(msg).embed(|e| fill_embed(e, &report))
        })
        .await?;

    Ok(())
}

/// Handle the "Parse Logs" message context command
pub async fn handle_parse_logs_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let target = command
        .data
        .resolved
        .messages
        .values()
        .next()
        .ok_or_else(|| eyre!("No message selected"))?;

    // Fetching logs can take longer than the interaction deadline
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
                .interaction_response_data(|d| d.ephemeral(true))
        })
        .await?;

    let invoker = invoker_event(command);
    let target = message_event(target);

    let report = match ctx.pipeline.run_staff_command(&invoker, &target).await {
        Some(report) => Some(report),
        None => ctx.pipeline.run_user_command(&invoker, &target).await,
    };

    match report {
        None => {
            command
                .edit_original_interaction_response(&ctx.ctx.http, |m| m.content(NOT_ALLOWED))
                .await?;
        }
        Some(report) if report.is_empty() => {
            command
                .edit_original_interaction_response(&ctx.ctx.http, |m| m.content(NOTHING_FOUND))
                .await?;
        }
        Some(report) => {
            command
                .edit_original_interaction_response(&ctx.ctx.http, |m| {
                    m.embed(|e| fill_embed(e, &report))
                })
                .await?;
        }
    }

    Ok(())
}

/// Converts a Discord message into the event the pipeline understands.
pub fn message_event(msg: &Message) -> MessageEvent {
    MessageEvent {
        content: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|attachment| Attachment {
                filename: attachment.filename.clone(),
                url: attachment.url.clone(),
                size: attachment.size,
            })
            .collect(),
        author: author(&msg.author, msg.member.as_ref().map(partial_member_roles)),
        channel_id: msg.channel_id.0,
        guild_id: msg.guild_id.map(|id| id.0),
    }
}

/// The member who invoked a command, as an event with no content.
pub fn invoker_event(command: &ApplicationCommandInteraction) -> MessageEvent {
    MessageEvent {
        author: author(&command.user, command.member.as_ref().map(member_roles)),
        channel_id: command.channel_id.0,
        guild_id: command.guild_id.map(|id| id.0),
        ..Default::default()
    }
}

fn author(user: &User, role_ids: Option<Vec<u64>>) -> Author {
    Author {
        id: user.id.0,
        bot: user.bot,
        role_ids: role_ids.unwrap_or_default(),
    }
}

fn partial_member_roles(member: &PartialMember) -> Vec<u64> {
    member.roles.iter().map(|role| role.0).collect()
}

fn member_roles(member: &Member) -> Vec<u64> {
    member.roles.iter().map(|role| role.0).collect()
}

pub fn report_title(report: &Report) -> &'static str {
    if report.aborted() {
        "Log analysis stopped"
    } else if report.has_problems() {
        "Problems found"
    } else {
        "Log analysis"
    }
}

pub fn report_color(report: &Report) -> Color {
    if report.aborted() {
        Color::RED
    } else if report.has_problems() {
        Color::ORANGE
    } else {
        Color::DARK_GREEN
    }
}

fn fill_embed<'a>(embed: &'a mut CreateEmbed, report: &Report) -> &'a mut CreateEmbed {
    embed
        .title(report_title(report))
        .description(report.render())
        .color(report_color(report))
}
