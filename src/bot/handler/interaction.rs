use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    Interaction,
};

use crate::{
    bot::command::{dispatch, CommandValue},
    state::BotState,
};

/// Dispatches slash commands and replies ephemerally with the outcome.
pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let options: Vec<(String, CommandValue)> = command
        .data
        .options()
        .iter()
        .map(|option| (option.name.to_string(), CommandValue::from(&option.value)))
        .collect();

    let roles = command
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();

    let Some(reply) = dispatch(state, &command.data.name, &options, &roles).await
    else {
        tracing::debug!("Ignoring unknown command '{}'", command.data.name);
        return;
    };

    respond(&ctx, &command, reply).await;
}

async fn respond(ctx: &Context, command: &CommandInteraction, content: String) {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);

    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        tracing::error!(
            "Failed to respond to command '{}': {}",
            command.data.name,
            e
        );
    }
}
