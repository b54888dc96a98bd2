use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{round_status::RoundStatusConfig, SharedConfig},
    controller::{
        assistant::OpenAiAssistant, round_status::RoundStatusController, ControllerRegistry,
    },
    error::AppError,
    scheduler::LoopScheduler,
};

const DEFAULT_LOG_FILTER: &str = "roundwatch=debug,serenity=warn,info";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Builds the HTTP client used for the assistant API.
///
/// Only connecting is bounded here; streamed runs are bounded by the assistant
/// controller's run deadline.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .map_err(crate::error::assistant::AssistantError::from)?;

    Ok(client)
}

/// Builds the controller registry.
///
/// Every controller the bot runs is listed here.
pub fn build_controllers(
    round_status: SharedConfig<RoundStatusConfig>,
    scheduler: LoopScheduler,
    assistant: Arc<OpenAiAssistant>,
) -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();

    registry.register(Arc::new(RoundStatusController::new(round_status, scheduler)));
    registry.register(assistant);

    registry
}
