mod bot;
mod config;
mod controller;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod topic;
mod util;

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::{
    config::{
        bot::BotConfig, open_ai::OpenAiConfig, round_status::RoundStatusConfig,
        store::ConfigStore, Config,
    },
    controller::assistant::AssistantController,
    error::AppError,
    scheduler::LoopScheduler,
    service::assistant::openai::OpenAiBackend,
    state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let store = ConfigStore::new(config.config_dir.clone());

    let bot_config = store.load::<BotConfig>().await?;
    bot_config.validate()?;
    let token = config.resolve_token(&bot_config.token)?;

    let round_status = Arc::new(RwLock::new(store.load::<RoundStatusConfig>().await?));

    let open_ai_config = store.load::<OpenAiConfig>().await?;
    let backend = OpenAiBackend::new(startup::setup_reqwest_client()?, &open_ai_config);
    let open_ai = Arc::new(RwLock::new(open_ai_config));
    let assistant = Arc::new(AssistantController::new(backend, open_ai.clone()));

    let scheduler = LoopScheduler::new().await?;
    let controllers =
        startup::build_controllers(round_status.clone(), scheduler.clone(), assistant.clone());

    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();
    let state = BotState::new(
        store,
        round_status,
        open_ai,
        bot_config.command_prefix.clone(),
        assistant,
        controllers.clone(),
        fatal_tx,
    );

    let mut client = bot::start::init_bot(&token, state).await?;
    let shard_manager = client.shard_manager.clone();

    tracing::info!("Starting Discord bot");
    let mut bot_task = tokio::spawn(async move { client.start().await });

    let result = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
        Some(e) = fatal_rx.recv() => {
            tracing::error!("Stopping after fatal error: {}", e);
            Err(e)
        }
        joined = &mut bot_task => match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(AppError::InternalError(format!("Discord client task failed: {}", e))),
        },
    };

    if let Err(e) = scheduler.shutdown().await {
        tracing::error!("Failed to stop loop scheduler: {}", e);
    }
    controllers.on_shutdown().await;
    bot::start::stop_bot(&shard_manager).await;

    result
}
