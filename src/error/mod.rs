//! Error types for the bot.
//!
//! Each concern owns a small `thiserror` enum. `AppError` is the top-level type
//! returned from startup and from the Discord-facing glue; the round status poller
//! never lets protocol errors escape past its own retry bookkeeping.

pub mod assistant;
pub mod config;
pub mod round_status;
pub mod settings;
pub mod status;
pub mod topic;

use thiserror::Error;

use crate::error::{
    assistant::AssistantError, config::ConfigError, round_status::RoundStatusError,
    settings::SettingsError, status::StatusError, topic::TopicError,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most
/// variants use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup, environment loading or config file access.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Topic protocol error from a game server query.
    #[error(transparent)]
    TopicErr(#[from] TopicError),

    /// Status response could not be interpreted.
    #[error(transparent)]
    StatusErr(#[from] StatusError),

    /// Round status display or channel error.
    #[error(transparent)]
    RoundStatusErr(#[from] RoundStatusError),

    /// Assistant request or reply failed.
    #[error(transparent)]
    AssistantErr(#[from] AssistantError),

    /// Slash command input was rejected.
    #[error(transparent)]
    SettingsErr(#[from] SettingsError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Loop scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Internal error with custom message.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
