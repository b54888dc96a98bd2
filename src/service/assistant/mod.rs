//! Assistant integration.
//!
//! The assistant itself is an external thread/run API reached through
//! [`AssistantBackend`]; answers are relayed to Discord through a [`ReplyTarget`].
//!
//! - `openai` - HTTP backend for the OpenAI Assistants API
//! - `reply` - Discord-backed reply target

pub mod openai;
pub mod reply;

use serenity::{all::MessageId, async_trait};
use tokio::sync::mpsc;

use crate::error::assistant::AssistantError;

/// Event observed while an assistant run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// The run created the message holding its answer.
    MessageCreated(String),
    /// A chunk of answer text.
    TextDelta(String),
}

/// Connection to the assistant's conversation threads.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Appends a user message to a thread.
    async fn create_message(&self, thread_id: &str, content: &str) -> Result<(), AssistantError>;

    /// Runs the assistant on a thread, forwarding events until the run ends.
    ///
    /// Returns once the run has finished. A closed `events` receiver stops
    /// forwarding but not the run.
    async fn run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        events: mpsc::Sender<AssistantEvent>,
    ) -> Result<(), AssistantError>;

    /// Fetches the text of a finished message.
    async fn retrieve_message(
        &self,
        thread_id: &str,
        message_id: &str,
    ) -> Result<String, AssistantError>;
}

/// Where the answer to one prompt is written.
#[async_trait]
pub trait ReplyTarget: Send + Sync {
    /// Shows the typing indicator while the assistant works.
    async fn start_typing(&self) -> Result<(), AssistantError>;

    /// Replies to the prompt message.
    async fn reply(&self, content: &str) -> Result<MessageId, AssistantError>;

    /// Replaces the content of an earlier reply.
    async fn edit_reply(&self, message: MessageId, content: &str) -> Result<(), AssistantError>;
}
