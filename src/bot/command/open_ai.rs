//! Assistant slash commands.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, RoleId};

use crate::{
    bot::command::{admin_command, CommandValue},
    config::open_ai::AssistantMode,
    error::AppError,
    service::settings::OpenAiSettingsService,
    state::BotState,
};

pub const SET_MODE: &str = "openai_mode";
pub const ADD_ALLOWED_ROLE: &str = "openai_add_allowed_role";
pub const REMOVE_ALLOWED_ROLE: &str = "openai_remove_allowed_role";

const GENERIC_FAILURE: &str = "Failed to update the assistant configuration";

#[derive(Debug, Clone, PartialEq)]
pub enum OpenAiCommand {
    SetMode(String),
    AddAllowedRole(RoleId),
    RemoveAllowedRole(RoleId),
}

impl OpenAiCommand {
    /// Parses a command by name; `None` if the name is not an assistant command.
    pub fn parse(name: &str, options: &[(String, CommandValue)]) -> Option<Result<Self, String>> {
        let value = options.first().map(|(_, value)| value);

        let parsed = match name {
            SET_MODE => match value {
                Some(CommandValue::String(mode)) => Ok(Self::SetMode(mode.clone())),
                _ => Err("Invalid mode".to_string()),
            },
            ADD_ALLOWED_ROLE => match value {
                Some(CommandValue::Role(role)) => Ok(Self::AddAllowedRole(*role)),
                _ => Err("Invalid role".to_string()),
            },
            REMOVE_ALLOWED_ROLE => match value {
                Some(CommandValue::Role(role)) => Ok(Self::RemoveAllowedRole(*role)),
                _ => Err("Invalid role".to_string()),
            },
            _ => return None,
        };

        Some(parsed)
    }

    /// Applies the command and returns the reply text for the invoking member.
    pub async fn execute(self, service: &OpenAiSettingsService<'_>, roles: &[RoleId]) -> String {
        let result = match &self {
            Self::SetMode(mode) => service
                .set_mode(roles, mode)
                .await
                .map(|mode| format!("Mode set: {}", mode)),
            Self::AddAllowedRole(role) => service
                .add_allowed_role(roles, *role)
                .await
                .map(|_| format!("Role <@&{}> added", role)),
            Self::RemoveAllowedRole(role) => service
                .remove_allowed_role(roles, *role)
                .await
                .map(|_| format!("Role <@&{}> removed", role)),
        };

        match result {
            Ok(message) => message,
            Err(AppError::SettingsErr(e)) => e.to_string(),
            Err(e) => {
                tracing::error!("Assistant command failed: {}", e);
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

/// Handles a command if it belongs to this module.
pub async fn dispatch(
    state: &BotState,
    name: &str,
    options: &[(String, CommandValue)],
    roles: &[RoleId],
) -> Option<String> {
    let command = match OpenAiCommand::parse(name, options)? {
        Ok(command) => command,
        Err(message) => return Some(message),
    };

    let service = OpenAiSettingsService::new(&state.store, &state.open_ai);
    Some(command.execute(&service, roles).await)
}

pub fn commands() -> Vec<CreateCommand> {
    let modes = [AssistantMode::Stream, AssistantMode::NoStream];
    let mode_option = modes.into_iter().fold(
        CreateCommandOption::new(CommandOptionType::String, "mode", "Reply mode").required(true),
        |option, mode| option.add_string_choice(mode.as_str(), mode.as_str()),
    );

    vec![
        admin_command(SET_MODE, "Set the assistant reply mode (stream/no_stream)")
            .add_option(mode_option),
        admin_command(ADD_ALLOWED_ROLE, "Allow a role to use assistant commands").add_option(
            CreateCommandOption::new(CommandOptionType::Role, "role", "Role to allow")
                .required(true),
        ),
        admin_command(REMOVE_ALLOWED_ROLE, "Revoke a role's access to assistant commands")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "Role to revoke")
                    .required(true),
            ),
    ]
}
