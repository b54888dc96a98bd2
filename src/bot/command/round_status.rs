//! Round status slash commands.
//!
//! All commands are guild-only, hidden from non-administrators by default, and
//! additionally gated on the round status roles from the configuration.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, RoleId};

use crate::{
    bot::command::{admin_command, CommandValue},
    error::AppError,
    service::settings::RoundStatusSettingsService,
    state::BotState,
};

pub const SET_HOST: &str = "rs_host";
pub const SET_PORT: &str = "rs_port";
pub const ADD_ALLOWED_ROLE: &str = "rs_add_allowed_role";
pub const REMOVE_ALLOWED_ROLE: &str = "rs_remove_allowed_role";

const GENERIC_FAILURE: &str = "Failed to update the round status configuration";

/// A parsed round status command.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundStatusCommand {
    SetHost(String),
    SetPort(i64),
    AddAllowedRole(RoleId),
    RemoveAllowedRole(RoleId),
}

impl RoundStatusCommand {
    /// Parses a command by name.
    ///
    /// # Returns
    /// - `None` - Not a round status command
    /// - `Some(Ok(command))` - Recognized command with its argument
    /// - `Some(Err(message))` - Recognized command with a missing or mistyped argument
    pub fn parse(name: &str, options: &[(String, CommandValue)]) -> Option<Result<Self, String>> {
        let value = options.first().map(|(_, value)| value);

        let parsed = match name {
            SET_HOST => match value {
                Some(CommandValue::String(host)) => Ok(Self::SetHost(host.clone())),
                _ => Err("Invalid host".to_string()),
            },
            SET_PORT => match value {
                Some(CommandValue::Integer(port)) => Ok(Self::SetPort(*port)),
                _ => Err("Invalid port".to_string()),
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
    ///
    /// Validation failures are answered with their message; anything else is logged
    /// and answered generically.
    pub async fn execute(
        self,
        service: &RoundStatusSettingsService<'_>,
        roles: &[RoleId],
    ) -> String {
        let result = match &self {
            Self::SetHost(host) => service.set_host(roles, host).await,
            Self::SetPort(port) => service.set_port(roles, *port).await,
            Self::AddAllowedRole(role) => service.add_allowed_role(roles, *role).await,
            Self::RemoveAllowedRole(role) => service.remove_allowed_role(roles, *role).await,
        };

        match result {
            Ok(()) => self.success_message(),
            Err(AppError::SettingsErr(e)) => e.to_string(),
            Err(e) => {
                tracing::error!("Round status command failed: {}", e);
                GENERIC_FAILURE.to_string()
            }
        }
    }

    fn success_message(&self) -> String {
        match self {
            Self::SetHost(host) => format!("Host set to {}", host.trim()),
            Self::SetPort(port) => format!("Port set to {}", port),
            Self::AddAllowedRole(role) => format!("Role <@&{}> added", role),
            Self::RemoveAllowedRole(role) => format!("Role <@&{}> removed", role),
        }
    }
}

/// Handles a command if it belongs to this module.
///
/// # Returns
/// - `None` - Command name is not a round status command
/// - `Some(reply)` - Text to send back ephemerally
pub async fn dispatch(
    state: &BotState,
    name: &str,
    options: &[(String, CommandValue)],
    roles: &[RoleId],
) -> Option<String> {
    let command = match RoundStatusCommand::parse(name, options)? {
        Ok(command) => command,
        Err(message) => return Some(message),
    };

    let service = RoundStatusSettingsService::new(&state.store, &state.round_status);
    Some(command.execute(&service, roles).await)
}

/// Definitions registered as global application commands.
pub fn commands() -> Vec<CreateCommand> {
    vec![
        admin_command(SET_HOST, "Set the game server host").add_option(
            CreateCommandOption::new(CommandOptionType::String, "host", "Server IP address")
                .required(true),
        ),
        admin_command(SET_PORT, "Set the game server port").add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "port", "Server port")
                .min_int_value(1)
                .max_int_value(65535)
                .required(true),
        ),
        admin_command(ADD_ALLOWED_ROLE, "Allow a role to use round status commands").add_option(
            CreateCommandOption::new(CommandOptionType::Role, "role", "Role to allow")
                .required(true),
        ),
        admin_command(REMOVE_ALLOWED_ROLE, "Revoke a role's access to round status commands")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "Role to revoke")
                    .required(true),
            ),
    ]
}
