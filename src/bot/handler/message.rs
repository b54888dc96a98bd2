//! Message handler for prefix commands.

use serenity::all::{Context, Message};

use crate::{
    bot::command::prefix::{self, PrefixCommand},
    error::{assistant::AssistantError, AppError},
    service::assistant::reply::DiscordReply,
    state::BotState,
};

const UNKNOWN_COMMAND: &str = "Unknown command.";
const ASSISTANT_FAILURE: &str = "Failed to get an answer from the assistant";

/// Runs the prefix command in a user's message, if there is one.
///
/// Messages from bots are ignored. Failures are logged and answered in the channel.
pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    let bot_id = ctx.cache.current_user().id;
    let Some(command) = prefix::parse(&message.content, &state.command_prefix, bot_id) else {
        return;
    };

    let answer = match run(state, &ctx, &message, command).await {
        Ok(()) => return,
        Err(Some(e)) => {
            tracing::error!(
                "Command '{}' from {} failed: {}",
                command.name,
                message.author.name,
                e
            );
            failure_text(&e)
        }
        Err(None) => {
            tracing::debug!("Unknown command '{}'", command.name);
            UNKNOWN_COMMAND
        }
    };

    if let Err(e) = message.reply(&ctx, answer).await {
        tracing::error!("Failed to reply to {}: {}", message.author.name, e);
    }
}

/// Executes a command; `Err(None)` if no command has that name.
async fn run(
    state: &BotState,
    ctx: &Context,
    message: &Message,
    command: PrefixCommand<'_>,
) -> Result<(), Option<AppError>> {
    match command.name {
        prefix::MIND => {
            let reply = DiscordReply::new(ctx.http.clone(), message.channel_id, message.id);
            state
                .assistant
                .mind(&message.author.name, command.args, &reply)
                .await
                .map_err(Some)
        }
        _ => Err(None),
    }
}

fn failure_text(error: &AppError) -> &'static str {
    match error {
        AppError::AssistantErr(AssistantError::NotConfigured) => "The assistant is not configured",
        AppError::AssistantErr(AssistantError::Timeout(_)) => "The assistant took too long to answer",
        _ => ASSISTANT_FAILURE,
    }
}
