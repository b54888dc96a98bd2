use thiserror::Error;

use crate::model::game_phase::GamePhase;

/// Errors raised by the round status controller and poller.
#[derive(Error, Debug)]
pub enum RoundStatusError {
    /// A phase without a display rendering reached the renderer.
    ///
    /// Propagates out of the tick; the display is left exactly as it was.
    #[error("Unknown game state: {0:?} has no status rendering")]
    UnrenderablePhase(GamePhase),

    /// `channel_id` is unset in the round-status configuration.
    #[error("Round status channel is not configured")]
    ChannelNotConfigured,

    /// Configured channel exists but cannot hold status messages.
    #[error("Channel {0} is not a text channel")]
    ChannelNotText(u64),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),
}

impl From<serenity::Error> for RoundStatusError {
    fn from(err: serenity::Error) -> Self {
        RoundStatusError::Discord(Box::new(err))
    }
}
