//! Ready event handler for bot initialization.
//!
//! Sets the presence, registers the global slash commands and starts every
//! controller. A controller failing to start is fatal and is reported to `main`
//! through the state's fatal error channel.

use serenity::all::{ActivityData, Command, Context, Ready};

use crate::{bot::command, error::AppError, model::bot_status::BotStatus, state::BotState};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared bot state holding the controllers
/// - `ctx` - Discord context for presence, commands and channel lookups
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom(BotStatus::Ready.text())));

    if let Err(e) = start(state, &ctx).await {
        tracing::error!("Failed to start bot controllers: {}", e);
        state.report_fatal(e);
    }
}

async fn start(state: &BotState, ctx: &Context) -> Result<(), AppError> {
    let commands = Command::set_global_commands(&ctx.http, command::commands()).await?;
    tracing::info!("Registered {} global commands", commands.len());

    state.controllers.on_ready(ctx).await
}
