//! Round status controller.
//!
//! Resolves the configured channel once the bot is ready, starts the poll loop and
//! leaves an offline status behind on shutdown.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serenity::{
    all::{Channel, ChannelId, ChannelType, Context},
    async_trait,
};
use tokio::sync::Mutex;

use crate::{
    config::{round_status::RoundStatusConfig, SharedConfig},
    controller::BotController,
    error::{round_status::RoundStatusError, AppError},
    scheduler::LoopScheduler,
    service::round_status::{channel::DiscordStatusChannel, poller::RoundStatusPoller},
    topic::TopicClient,
};

const LOOP_NAME: &str = "round-status";

type Poller = RoundStatusPoller<TopicClient, DiscordStatusChannel>;

pub struct RoundStatusController {
    config: SharedConfig<RoundStatusConfig>,
    scheduler: LoopScheduler,
    poller: Arc<Mutex<Option<Poller>>>,
    started: AtomicBool,
}

impl RoundStatusController {
    pub fn new(config: SharedConfig<RoundStatusConfig>, scheduler: LoopScheduler) -> Self {
        Self {
            config,
            scheduler,
            poller: Arc::new(Mutex::new(None)),
            started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BotController for RoundStatusController {
    fn name(&self) -> &'static str {
        "round-status"
    }

    /// Builds the poller and registers its loop.
    ///
    /// Only the first ready event starts the loop; later ones (reconnects) are
    /// ignored.
    ///
    /// # Returns
    /// - `Ok(())` - Loop registered, or already running
    /// - `Err(AppError::RoundStatusErr(ChannelNotConfigured))` - `channel_id` is 0
    /// - `Err(AppError::RoundStatusErr(ChannelNotText))` - Channel is not a guild text channel
    /// - `Err(AppError::DiscordErr)` - Channel lookup failed
    async fn on_ready(&self, ctx: &Context) -> Result<(), AppError> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Round status loop already running");
            return Ok(());
        }

        let (channel_id, interval) = {
            let config = self.config.read().await;
            (config.channel_id, config.poll_interval())
        };

        if channel_id == 0 {
            return Err(RoundStatusError::ChannelNotConfigured.into());
        }

        let channel_id = ChannelId::new(channel_id);
        let channel = channel_id.to_channel(ctx).await?;
        ensure_text_channel(&channel)?;

        let poller = RoundStatusPoller::new(
            TopicClient::new(),
            DiscordStatusChannel::new(ctx.http.clone(), channel_id),
            self.config.clone(),
        );
        *self.poller.lock().await = Some(poller);

        let poller = self.poller.clone();
        self.scheduler
            .register(LOOP_NAME, interval, move || {
                let poller = poller.clone();
                async move {
                    let mut guard = poller.lock().await;
                    match guard.as_mut() {
                        Some(poller) => poller.tick().await.map(|_| ()),
                        None => Ok(()),
                    }
                }
            })
            .await?;

        tracing::info!("Posting round status to channel {}", channel_id);
        Ok(())
    }

    /// Marks the status display as offline.
    async fn on_shutdown(&self) -> Result<(), AppError> {
        let mut guard = self.poller.lock().await;

        if let Some(poller) = guard.as_mut() {
            poller.shutdown().await?;
        }

        Ok(())
    }
}

fn ensure_text_channel(channel: &Channel) -> Result<(), RoundStatusError> {
    match channel {
        Channel::Guild(guild_channel)
            if matches!(guild_channel.kind, ChannelType::Text | ChannelType::News) =>
        {
            Ok(())
        }
        other => Err(RoundStatusError::ChannelNotText(other.id().get())),
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::RwLock;

    use super::*;

    /// Tests shutdown before the bot was ever ready.
    ///
    /// Verifies that no poller means nothing to mark offline.
    ///
    /// Expected: Ok(())
    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_without_poller_is_noop() {
        let scheduler = LoopScheduler::new().await.unwrap();
        let controller = RoundStatusController::new(
            Arc::new(RwLock::new(RoundStatusConfig::default())),
            scheduler.clone(),
        );

        controller.on_shutdown().await.unwrap();
        scheduler.shutdown().await.unwrap();
    }
}
