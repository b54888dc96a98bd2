//! Assistant controller.
//!
//! Answers `mind` prompts through the configured assistant. Prompts are handled
//! one at a time because a thread accepts only one active run.

use std::time::Duration;

use serenity::{
    all::{Context, MessageId},
    async_trait,
};
use tokio::sync::{mpsc, Mutex};

use crate::{
    config::{
        open_ai::{AssistantMode, OpenAiConfig},
        SharedConfig,
    },
    controller::BotController,
    error::{assistant::AssistantError, AppError},
    service::assistant::{openai::OpenAiBackend, AssistantBackend, AssistantEvent, ReplyTarget},
};

/// Longest time a single run may take before the prompt is abandoned.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const EVENT_BUFFER: usize = 32;

/// Assistant controller used by the bot.
pub type OpenAiAssistant = AssistantController<OpenAiBackend>;

pub struct AssistantController<B> {
    backend: B,
    config: SharedConfig<OpenAiConfig>,
    run_timeout: Duration,
    busy: Mutex<()>,
}

impl<B: AssistantBackend> AssistantController<B> {
    pub fn new(backend: B, config: SharedConfig<OpenAiConfig>) -> Self {
        Self {
            backend,
            config,
            run_timeout: RUN_TIMEOUT,
            busy: Mutex::new(()),
        }
    }

    /// Overrides the run deadline.
    pub fn run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Sends a prompt to the assistant and answers it through `reply`.
    ///
    /// The prompt is posted as `<author>:<prompt>`. In stream mode the first text
    /// chunk becomes the reply and every further chunk edits it; otherwise the
    /// finished message is fetched and sent as one reply.
    ///
    /// # Returns
    /// - `Ok(())` - Answer delivered
    /// - `Err(AppError::AssistantErr(NotConfigured))` - Key, assistant or thread unset
    /// - `Err(AppError::AssistantErr(Timeout))` - Run exceeded the deadline
    /// - `Err(AppError::AssistantErr)` - Backend or Discord call failed
    pub async fn mind<R: ReplyTarget>(
        &self,
        author: &str,
        prompt: &str,
        reply: &R,
    ) -> Result<(), AppError> {
        let _guard = self.busy.lock().await;

        let (thread_id, assistant_id, mode) = {
            let config = self.config.read().await;
            if !config.is_configured() {
                return Err(AssistantError::NotConfigured.into());
            }
            (
                config.thread_id.clone(),
                config.assistant_id.clone(),
                config.mode,
            )
        };

        if let Err(e) = reply.start_typing().await {
            tracing::warn!("Failed to show typing indicator: {}", e);
        }

        let message = format!("{}:{}", author, prompt);
        self.backend.create_message(&thread_id, &message).await?;

        tracing::debug!(
            "Running assistant {} on thread {} ({})",
            assistant_id,
            thread_id,
            mode
        );

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let run = self.backend.run(&thread_id, &assistant_id, tx);

        let exchange = async {
            match mode {
                AssistantMode::Stream => {
                    let (run, relayed) = tokio::join!(run, relay_stream(rx, reply));
                    run?;
                    relayed?.ok_or(AssistantError::NoReply).map(|_| ())
                }
                AssistantMode::NoStream => {
                    let (run, message_id) = tokio::join!(run, first_message_id(rx));
                    run?;
                    let message_id = message_id.ok_or(AssistantError::NoReply)?;
                    let text = self
                        .backend
                        .retrieve_message(&thread_id, &message_id)
                        .await?;
                    reply.reply(&text).await.map(|_| ())
                }
            }
        };

        tokio::time::timeout(self.run_timeout, exchange)
            .await
            .map_err(|_| AssistantError::Timeout(self.run_timeout))??;

        Ok(())
    }
}

/// Replies with the first chunk and edits the reply with the growing text.
///
/// Returns the reply, or `None` if the run produced no text.
async fn relay_stream<R: ReplyTarget>(
    mut events: mpsc::Receiver<AssistantEvent>,
    reply: &R,
) -> Result<Option<MessageId>, AssistantError> {
    let mut text = String::new();
    let mut message = None;

    while let Some(event) = events.recv().await {
        let AssistantEvent::TextDelta(delta) = event else {
            continue;
        };
        text.push_str(&delta);

        match message {
            None => message = Some(reply.reply(&text).await?),
            Some(id) => reply.edit_reply(id, &text).await?,
        }
    }

    Ok(message)
}

/// Waits for the id of the first message the run creates.
async fn first_message_id(mut events: mpsc::Receiver<AssistantEvent>) -> Option<String> {
    let mut first = None;

    while let Some(event) = events.recv().await {
        if let (None, AssistantEvent::MessageCreated(id)) = (&first, event) {
            first = Some(id);
        }
    }

    first
}

#[async_trait]
impl<B: AssistantBackend> BotController for AssistantController<B> {
    fn name(&self) -> &'static str {
        "assistant"
    }

    /// Reports whether prompts can be answered; an unconfigured assistant is not fatal.
    async fn on_ready(&self, _ctx: &Context) -> Result<(), AppError> {
        let config = self.config.read().await;

        if config.is_configured() {
            tracing::info!("Assistant ready in {} mode", config.mode);
        } else {
            tracing::warn!("Assistant is not configured, prompts will be refused");
        }

        Ok(())
    }

    async fn on_shutdown(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use tokio::sync::RwLock;

    use super::*;

    /// Backend replaying a fixed list of run events.
    #[derive(Default)]
    struct ScriptedBackend {
        events: Vec<AssistantEvent>,
        /// Finished messages by id.
        messages: Vec<(String, String)>,
        posted: StdMutex<Vec<(String, String)>>,
        hang: bool,
    }

    #[async_trait]
    impl AssistantBackend for ScriptedBackend {
        async fn create_message(
            &self,
            thread_id: &str,
            content: &str,
        ) -> Result<(), AssistantError> {
            self.posted
                .lock()
                .unwrap()
                .push((thread_id.to_string(), content.to_string()));
            Ok(())
        }

        async fn run(
            &self,
            _thread_id: &str,
            _assistant_id: &str,
            events: mpsc::Sender<AssistantEvent>,
        ) -> Result<(), AssistantError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            for event in &self.events {
                if events.send(event.clone()).await.is_err() {
                    break;
                }
            }
            Ok(())
        }

        async fn retrieve_message(
            &self,
            _thread_id: &str,
            message_id: &str,
        ) -> Result<String, AssistantError> {
            self.messages
                .iter()
                .find(|(id, _)| id == message_id)
                .map(|(_, text)| text.clone())
                .ok_or(AssistantError::NoReply)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ReplyOp {
        Typing,
        Reply(String),
        Edit(MessageId, String),
    }

    #[derive(Default)]
    struct RecordingReply {
        ops: StdMutex<Vec<ReplyOp>>,
    }

    impl RecordingReply {
        fn ops(&self) -> Vec<ReplyOp> {
            self.ops.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReplyTarget for RecordingReply {
        async fn start_typing(&self) -> Result<(), AssistantError> {
            self.ops.lock().unwrap().push(ReplyOp::Typing);
            Ok(())
        }

        async fn reply(&self, content: &str) -> Result<MessageId, AssistantError> {
            self.ops
                .lock()
                .unwrap()
                .push(ReplyOp::Reply(content.to_string()));
            Ok(MessageId::new(900))
        }

        async fn edit_reply(
            &self,
            message: MessageId,
            content: &str,
        ) -> Result<(), AssistantError> {
            self.ops
                .lock()
                .unwrap()
                .push(ReplyOp::Edit(message, content.to_string()));
            Ok(())
        }
    }

    fn config(mode: AssistantMode) -> SharedConfig<OpenAiConfig> {
        Arc::new(RwLock::new(OpenAiConfig {
            api_key: "sk-test".to_string(),
            assistant_id: "asst_1".to_string(),
            thread_id: "thread_1".to_string(),
            mode,
            ..Default::default()
        }))
    }

    fn delta(text: &str) -> AssistantEvent {
        AssistantEvent::TextDelta(text.to_string())
    }

    /// Tests a streamed answer.
    ///
    /// Verifies that the prompt is posted with the author prefix, the first chunk
    /// becomes the reply and later chunks edit it with the accumulated text.
    ///
    /// Expected: typing, reply "Hel", edit "Hello", edit "Hello!"
    #[tokio::test]
    async fn stream_mode_edits_reply() {
        let backend = ScriptedBackend {
            events: vec![
                AssistantEvent::MessageCreated("msg_1".to_string()),
                delta("Hel"),
                delta("lo"),
                delta("!"),
            ],
            ..Default::default()
        };
        let controller = AssistantController::new(backend, config(AssistantMode::Stream));
        let reply = RecordingReply::default();

        controller.mind("alice", "say hello", &reply).await.unwrap();

        assert_eq!(
            *controller.backend.posted.lock().unwrap(),
            vec![("thread_1".to_string(), "alice:say hello".to_string())]
        );
        assert_eq!(
            reply.ops(),
            vec![
                ReplyOp::Typing,
                ReplyOp::Reply("Hel".to_string()),
                ReplyOp::Edit(MessageId::new(900), "Hello".to_string()),
                ReplyOp::Edit(MessageId::new(900), "Hello!".to_string()),
            ]
        );
    }

    /// Tests a single answer.
    ///
    /// Verifies that deltas are not relayed and the finished message is fetched by
    /// the id of the first created message.
    ///
    /// Expected: typing, one reply with the stored text of msg_1
    #[tokio::test]
    async fn no_stream_mode_replies_once() {
        let backend = ScriptedBackend {
            events: vec![
                AssistantEvent::MessageCreated("msg_1".to_string()),
                delta("partial"),
                AssistantEvent::MessageCreated("msg_1".to_string()),
            ],
            messages: vec![("msg_1".to_string(), "Full answer".to_string())],
            ..Default::default()
        };
        let controller = AssistantController::new(backend, config(AssistantMode::NoStream));
        let reply = RecordingReply::default();

        controller.mind("bob", "question", &reply).await.unwrap();

        assert_eq!(
            reply.ops(),
            vec![ReplyOp::Typing, ReplyOp::Reply("Full answer".to_string())]
        );
    }

    /// Tests a run that never creates a message.
    ///
    /// Expected: Err(AssistantErr(NoReply)), no reply sent
    #[tokio::test]
    async fn no_stream_without_message_fails() {
        let controller =
            AssistantController::new(ScriptedBackend::default(), config(AssistantMode::NoStream));
        let reply = RecordingReply::default();

        let result = controller.mind("bob", "question", &reply).await;

        assert!(matches!(
            result,
            Err(AppError::AssistantErr(AssistantError::NoReply))
        ));
        assert_eq!(reply.ops(), vec![ReplyOp::Typing]);
    }

    /// Tests prompting without credentials.
    ///
    /// Expected: Err(AssistantErr(NotConfigured)), nothing posted or replied
    #[tokio::test]
    async fn unconfigured_refuses_prompt() {
        let config = Arc::new(RwLock::new(OpenAiConfig::default()));
        let controller = AssistantController::new(ScriptedBackend::default(), config);
        let reply = RecordingReply::default();

        let result = controller.mind("carol", "hi", &reply).await;

        assert!(matches!(
            result,
            Err(AppError::AssistantErr(AssistantError::NotConfigured))
        ));
        assert!(controller.backend.posted.lock().unwrap().is_empty());
        assert!(reply.ops().is_empty());
    }

    /// Tests a run exceeding the deadline.
    ///
    /// Expected: Err(AssistantErr(Timeout))
    #[tokio::test]
    async fn stalled_run_times_out() {
        let backend = ScriptedBackend {
            hang: true,
            ..Default::default()
        };
        let controller = AssistantController::new(backend, config(AssistantMode::Stream))
            .run_timeout(Duration::from_millis(50));
        let reply = RecordingReply::default();

        let result = controller.mind("dave", "hi", &reply).await;

        assert!(matches!(
            result,
            Err(AppError::AssistantErr(AssistantError::Timeout(_)))
        ));
    }
}
