use std::sync::Arc;

use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, MessageId},
    async_trait,
    http::Http,
};

use crate::{error::assistant::AssistantError, service::assistant::ReplyTarget};

/// Replies to one prompt message in its channel.
pub struct DiscordReply {
    http: Arc<Http>,
    channel_id: ChannelId,
    prompt_id: MessageId,
}

impl DiscordReply {
    pub fn new(http: Arc<Http>, channel_id: ChannelId, prompt_id: MessageId) -> Self {
        Self {
            http,
            channel_id,
            prompt_id,
        }
    }
}

#[async_trait]
impl ReplyTarget for DiscordReply {
    async fn start_typing(&self) -> Result<(), AssistantError> {
        self.http.broadcast_typing(self.channel_id).await?;
        Ok(())
    }

    async fn reply(&self, content: &str) -> Result<MessageId, AssistantError> {
        let message = CreateMessage::new()
            .content(content)
            .reference_message((self.channel_id, self.prompt_id));
        let sent = self.channel_id.send_message(&self.http, message).await?;

        Ok(sent.id)
    }

    async fn edit_reply(&self, message: MessageId, content: &str) -> Result<(), AssistantError> {
        let edit = EditMessage::new().content(content);

        self.http
            .edit_message(self.channel_id, message, &edit, vec![])
            .await?;

        Ok(())
    }
}
