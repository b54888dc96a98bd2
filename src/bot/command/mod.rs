//! Slash and prefix commands.
//!
//! - `round_status` - `rs_*` settings commands for the round status display
//! - `open_ai` - `openai_*` settings commands for the assistant
//! - `prefix` - Message commands such as `!mind`

pub mod open_ai;
pub mod prefix;
pub mod round_status;

use serenity::all::{CreateCommand, Permissions, ResolvedValue, RoleId};

use crate::state::BotState;

/// Option value reduced to the shapes the slash commands accept.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandValue {
    String(String),
    Integer(i64),
    Role(RoleId),
    Other,
}

impl From<&ResolvedValue<'_>> for CommandValue {
    fn from(value: &ResolvedValue<'_>) -> Self {
        match value {
            ResolvedValue::String(s) => Self::String(s.to_string()),
            ResolvedValue::Integer(i) => Self::Integer(*i),
            ResolvedValue::Role(role) => Self::Role(role.id),
            _ => Self::Other,
        }
    }
}

/// Every slash command registered globally on ready.
pub fn commands() -> Vec<CreateCommand> {
    let mut commands = round_status::commands();
    commands.extend(open_ai::commands());
    commands
}

/// Routes a slash command to the module that owns it.
///
/// # Returns
/// - `None` - No module knows the command
/// - `Some(reply)` - Text to send back ephemerally
pub async fn dispatch(
    state: &BotState,
    name: &str,
    options: &[(String, CommandValue)],
    roles: &[RoleId],
) -> Option<String> {
    if let Some(reply) = round_status::dispatch(state, name, options, roles).await {
        return Some(reply);
    }

    open_ai::dispatch(state, name, options, roles).await
}

/// Guild-only command hidden from non-administrators by default.
fn admin_command(name: &str, description: &str) -> CreateCommand {
    CreateCommand::new(name)
        .description(description)
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .dm_permission(false)
}
