use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandType,
};

/// Name shown in the message context menu.
pub const PARSE_LOGS: &str = "Parse Logs";

/// Context menu command that runs the log pipeline on the selected message.
///
/// Message commands carry no description or options.
pub fn parse_logs_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(PARSE_LOGS)
        .kind(CommandType::Message)
        .dm_permission(false);

    command
}
