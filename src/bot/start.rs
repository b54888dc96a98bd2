use std::sync::Arc;

use serenity::all::{ActivityData, Client, GatewayIntents, ShardManager};

use crate::{
    bot::handler::Handler, error::AppError, model::bot_status::BotStatus, state::BotState,
};

/// Builds the Discord client.
///
/// The client is returned unstarted so the caller can keep its shard manager for
/// shutdown before handing it to a task.
///
/// # Arguments
/// - `token` - Bot token
/// - `state` - Shared state handed to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to `start()`
/// - `Err(AppError::DiscordErr)` - Client construction failed (e.g. malformed token)
pub async fn init_bot(token: &str, state: BotState) -> Result<Client, AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let client = Client::builder(token, intents)
        .event_handler(Handler::new(state))
        .await?;

    Ok(client)
}

/// Switches the presence to the offline status and closes all shards.
pub async fn stop_bot(shard_manager: &Arc<ShardManager>) {
    {
        let runners = shard_manager.runners.lock().await;
        for runner in runners.values() {
            runner
                .runner_tx
                .set_activity(Some(ActivityData::custom(BotStatus::Off.text())));
        }
    }

    shard_manager.shutdown_all().await;
    tracing::info!("Discord client stopped");
}
