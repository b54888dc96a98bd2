use thiserror::Error;

/// Rejections of slash command input.
///
/// The `Display` text of each variant is sent back to the invoking user as an
/// ephemeral reply, so it must stay free of internal detail.
#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    /// Member holds neither the main role nor an allowed role.
    #[error("You do not have access to this command")]
    AccessDenied,

    #[error("Invalid host")]
    InvalidHost,

    #[error("Invalid port")]
    InvalidPort,

    #[error("Invalid mode")]
    InvalidMode,

    #[error("Invalid role")]
    InvalidRole,

    #[error("Role already added")]
    RoleAlreadyAdded,

    #[error("Role not found in configuration")]
    RoleNotFound,

    #[error("You cannot add the main role")]
    CannotAddMainRole,

    #[error("You cannot remove the main role")]
    CannotRemoveMainRole,
}
