use std::sync::Arc;

use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, MessageId},
    async_trait,
    http::Http,
};

use crate::{
    error::round_status::RoundStatusError,
    model::display::StatusView,
    service::round_status::{builder::build_status_embed, StatusChannel},
};

/// Status channel backed by a Discord text channel.
pub struct DiscordStatusChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordStatusChannel {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl StatusChannel for DiscordStatusChannel {
    async fn post_status(&self, view: &StatusView) -> Result<MessageId, RoundStatusError> {
        let message = CreateMessage::new().embed(build_status_embed(view));
        let sent = self.channel_id.send_message(&self.http, message).await?;

        tracing::debug!("Posted status message {} in channel {}", sent.id, self.channel_id);

        Ok(sent.id)
    }

    async fn post_announcement(&self, content: &str) -> Result<MessageId, RoundStatusError> {
        let message = CreateMessage::new().content(content);
        let sent = self.channel_id.send_message(&self.http, message).await?;

        Ok(sent.id)
    }

    async fn edit_status(
        &self,
        message: MessageId,
        view: &StatusView,
    ) -> Result<(), RoundStatusError> {
        let edit = EditMessage::new().embed(build_status_embed(view));

        self.http
            .edit_message(self.channel_id, message, &edit, vec![])
            .await?;

        Ok(())
    }

    async fn delete_message(&self, message: MessageId) -> Result<(), RoundStatusError> {
        self.http
            .delete_message(self.channel_id, message, None)
            .await?;

        tracing::debug!("Deleted message {} in channel {}", message, self.channel_id);

        Ok(())
    }
}
