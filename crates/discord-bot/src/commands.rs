use serenity::builder::CreateApplicationCommands;

pub mod parse_logs;

/// Register all commands for the bot.
///
/// # Arguments
///
/// * `commands` - A mutable reference to a CreateApplicationCommands object
///                that will be modified to include our custom commands.
///
/// # Returns
///
/// The same CreateApplicationCommands object with our commands added.
pub fn register_commands(commands: &mut CreateApplicationCommands) -> &mut CreateApplicationCommands {
    // Message context menu entry
    commands.create_application_command(|command| {
        *command = parse_logs::parse_logs_command();
        command
    });

    commands
}
