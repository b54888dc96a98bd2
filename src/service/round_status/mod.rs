//! Round status polling and display reconciliation.
//!
//! The poller depends on two seams so its state machine can be driven without a
//! network or a Discord connection:
//! - [`StatusSource`] yields decoded `?status` maps (the topic client in production)
//! - [`StatusChannel`] posts, edits and deletes messages (a Discord channel in production)
//!
//! Modules:
//! - `builder` - Embed construction from display content
//! - `channel` - Discord backed [`StatusChannel`]
//! - `poller` - Tick state machine

pub mod builder;
pub mod channel;
pub mod poller;

use std::collections::HashMap;

use serenity::{all::MessageId, async_trait};

use crate::{
    error::{round_status::RoundStatusError, topic::TopicError},
    model::display::StatusView,
    topic::{connector::Connector, TopicClient},
};

/// Source of server status snapshots.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches one status map; `Ok(None)` when the server answered with another type.
    async fn fetch_status(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Option<HashMap<String, String>>, TopicError>;
}

#[async_trait]
impl<C: Connector> StatusSource for TopicClient<C> {
    async fn fetch_status(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Option<HashMap<String, String>>, TopicError> {
        self.query_status(host, port).await
    }
}

/// Channel the status display lives in.
#[async_trait]
pub trait StatusChannel: Send + Sync {
    /// Posts a new status embed and returns its message id.
    async fn post_status(&self, view: &StatusView) -> Result<MessageId, RoundStatusError>;

    /// Posts the plain-text new-round announcement.
    async fn post_announcement(&self, content: &str) -> Result<MessageId, RoundStatusError>;

    /// Replaces the embed of an existing status message.
    async fn edit_status(
        &self,
        message: MessageId,
        view: &StatusView,
    ) -> Result<(), RoundStatusError>;

    async fn delete_message(&self, message: MessageId) -> Result<(), RoundStatusError>;
}
