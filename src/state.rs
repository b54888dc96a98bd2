//! State shared with the Discord event handler.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    config::{
        open_ai::OpenAiConfig, round_status::RoundStatusConfig, store::ConfigStore,
        SharedConfig,
    },
    controller::{assistant::OpenAiAssistant, ControllerRegistry},
    error::AppError,
};

/// Everything the event handlers need, cloned into the Serenity handler once.
#[derive(Clone)]
pub struct BotState {
    /// Store used by slash commands to persist configuration changes.
    pub store: ConfigStore,
    /// Live round status settings, also read by the poller every tick.
    pub round_status: SharedConfig<RoundStatusConfig>,
    pub open_ai: SharedConfig<OpenAiConfig>,
    /// Prefix for message commands, from `bot.json`.
    pub command_prefix: String,
    /// Answers `mind` prompts; also registered as a controller.
    pub assistant: Arc<OpenAiAssistant>,
    pub controllers: ControllerRegistry,
    /// Errors that should stop the process, received by `main`.
    fatal_tx: UnboundedSender<AppError>,
}

impl BotState {
    pub fn new(
        store: ConfigStore,
        round_status: SharedConfig<RoundStatusConfig>,
        open_ai: SharedConfig<OpenAiConfig>,
        command_prefix: String,
        assistant: Arc<OpenAiAssistant>,
        controllers: ControllerRegistry,
        fatal_tx: UnboundedSender<AppError>,
    ) -> Self {
        Self {
            store,
            round_status,
            open_ai,
            command_prefix,
            assistant,
            controllers,
            fatal_tx,
        }
    }

    /// Hands an unrecoverable error to `main`, which shuts the bot down.
    pub fn report_fatal(&self, error: AppError) {
        if self.fatal_tx.send(error).is_err() {
            tracing::error!("Fatal error reported after shutdown began");
        }
    }
}
