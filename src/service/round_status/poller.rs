//! Round status tick state machine.
//!
//! One tick queries the game server once and reconciles the status display:
//!
//! 1. A failed query bumps the failure counter. At [`FAILURE_THRESHOLD`] the session
//!    resets and, unless the last phase was `Unknown` or `EndGame`, both messages
//!    are deleted.
//! 2. A successful query resets the counter. Responses without `round_duration` or
//!    `gamestate` are logged and skipped.
//! 3. New messages are posted when the session is not initialized, or when a round
//!    moves from `EndGame` to `Startup`. Otherwise the status message is edited.
//! 4. The observed phase and status are remembered for the next tick.

use std::time::Duration;

use chrono::Utc;
use serenity::all::MessageId;

use crate::{
    config::{round_status::RoundStatusConfig, SharedConfig},
    error::{status::StatusError, AppError},
    model::{
        display::{format_round_time, StatusDisplay, StatusView},
        game_phase::GamePhase,
        status::{self, ServerStatus},
    },
    service::round_status::{StatusChannel, StatusSource},
};

/// Consecutive failed queries tolerated before the display is torn down.
pub const FAILURE_THRESHOLD: u32 = 5;

/// State carried from one tick to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundSession {
    pub last_phase: GamePhase,
    pub last_status: Option<ServerStatus>,
    /// Whether a status display has been posted since the last reset.
    pub initialized: bool,
    pub failed_attempts: u32,
    pub status_message: Option<MessageId>,
    pub announcement_message: Option<MessageId>,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Query failed below the threshold.
    Failed { attempts: u32 },
    /// Query failed at the threshold and the session was reset.
    Reset { torn_down: bool },
    /// Response lacked usable required fields; nothing changed.
    Skipped,
    /// Fresh status and announcement messages were posted.
    Created(GamePhase),
    /// The existing status message was edited.
    Edited(GamePhase),
}

/// Polls round status and keeps one status display in sync with it.
///
/// Ticks take `&mut self`, so the session can only ever be advanced by one tick at a
/// time.
pub struct RoundStatusPoller<S, C> {
    source: S,
    channel: C,
    config: SharedConfig<RoundStatusConfig>,
    session: RoundSession,
}

impl<S: StatusSource, C: StatusChannel> RoundStatusPoller<S, C> {
    pub fn new(source: S, channel: C, config: SharedConfig<RoundStatusConfig>) -> Self {
        Self {
            source,
            channel,
            config,
            session: RoundSession::default(),
        }
    }

    pub fn session(&self) -> &RoundSession {
        &self.session
    }

    /// Runs one poll and reconciles the display.
    ///
    /// Host and port are read from the shared configuration on every call, so
    /// changes apply on the next tick.
    ///
    /// # Returns
    /// - `Ok(TickOutcome)` - Tick finished, including failed or skipped queries
    /// - `Err(AppError::StatusErr)` - `gamestate` held an unknown phase
    /// - `Err(AppError::RoundStatusErr)` - Phase could not be rendered or a Discord
    ///   call failed; the session is left as it was before the tick
    pub async fn tick(&mut self) -> Result<TickOutcome, AppError> {
        let (host, port, announcement) = {
            let config = self.config.read().await;
            (config.host.clone(), config.port, config.announcement())
        };

        tracing::info!("Querying round status: {}:{}", host, port);

        let map = match self.source.fetch_status(&host, port).await {
            Ok(Some(map)) => map,
            Ok(None) => {
                tracing::error!(
                    "Failed to query round status: unexpected response type (attempt {})",
                    self.session.failed_attempts + 1
                );
                return Ok(self.record_failure().await);
            }
            Err(e) => {
                tracing::error!(
                    "Failed to query round status: {} (attempt {})",
                    e,
                    self.session.failed_attempts + 1
                );
                return Ok(self.record_failure().await);
            }
        };

        self.session.failed_attempts = 0;

        let (round_duration, phase) = match status::required_fields(&map) {
            Ok(fields) => fields,
            Err(e @ StatusError::UnknownPhase(_)) => return Err(e.into()),
            Err(e) => {
                tracing::error!("Skipping round status update: {}", e);
                return Ok(TickOutcome::Skipped);
            }
        };

        let status = ServerStatus::from_query(&map)?;
        log_state(round_duration, phase);

        let display = StatusDisplay::from_status(&status, Utc::now())?;
        let view = StatusView::live(display);

        let outcome = self.reconcile(phase, &view, &announcement).await?;

        self.session.last_phase = phase;
        self.session.last_status = Some(status);

        Ok(outcome)
    }

    /// Re-renders the last known status as offline.
    ///
    /// Edits the existing status message only; nothing is posted.
    ///
    /// # Returns
    /// - `Ok(true)` - Offline status written
    /// - `Ok(false)` - No status message or no known status to render
    /// - `Err(AppError)` - Rendering or the Discord edit failed
    pub async fn shutdown(&mut self) -> Result<bool, AppError> {
        let (Some(message), Some(status)) =
            (self.session.status_message, self.session.last_status.as_ref())
        else {
            return Ok(false);
        };

        let display = StatusDisplay::from_status(status, Utc::now())?;
        self.channel
            .edit_status(message, &StatusView::offline(display))
            .await?;

        tracing::info!("Marked round status as offline");

        Ok(true)
    }

    async fn reconcile(
        &mut self,
        phase: GamePhase,
        view: &StatusView,
        announcement: &str,
    ) -> Result<TickOutcome, AppError> {
        let last = self.session.last_phase;
        let new_round = phase == GamePhase::Startup && phase != last && last == GamePhase::EndGame;

        if self.session.initialized && !new_round {
            if let Some(message) = self.session.status_message {
                self.channel.edit_status(message, view).await?;
                return Ok(TickOutcome::Edited(phase));
            }
        }

        let status_message = self.channel.post_status(view).await?;

        let announcement_message = match self.channel.post_announcement(announcement).await {
            Ok(message) => message,
            Err(e) => {
                // The session keeps its old handles, so the lone embed must not linger.
                if let Err(delete_err) = self.channel.delete_message(status_message).await {
                    tracing::warn!(
                        "Failed to delete round status message {}: {}",
                        status_message,
                        delete_err
                    );
                }
                return Err(e.into());
            }
        };

        self.session.status_message = Some(status_message);
        self.session.announcement_message = Some(announcement_message);
        self.session.initialized = true;

        tracing::info!("Posted new round status message {}", status_message);

        Ok(TickOutcome::Created(phase))
    }

    async fn record_failure(&mut self) -> TickOutcome {
        self.session.failed_attempts += 1;

        if self.session.failed_attempts < FAILURE_THRESHOLD {
            return TickOutcome::Failed {
                attempts: self.session.failed_attempts,
            };
        }

        self.session.failed_attempts = 0;
        self.session.initialized = false;

        if matches!(
            self.session.last_phase,
            GamePhase::Unknown | GamePhase::EndGame
        ) {
            return TickOutcome::Reset { torn_down: false };
        }

        tracing::warn!(
            "Round status unreachable after {} attempts, removing status display",
            FAILURE_THRESHOLD
        );

        self.session.last_phase = GamePhase::Unknown;

        let messages = [
            self.session.status_message.take(),
            self.session.announcement_message.take(),
        ];
        for message in messages.into_iter().flatten() {
            if let Err(e) = self.channel.delete_message(message).await {
                tracing::warn!("Failed to delete round status message {}: {}", message, e);
            }
        }

        TickOutcome::Reset { torn_down: true }
    }
}

fn log_state(round_duration: Duration, phase: GamePhase) {
    if phase == GamePhase::InGame {
        tracing::info!(
            "Game state: {}. Time: {}",
            phase.friendly_name(),
            format_round_time(round_duration)
        );
    } else {
        tracing::info!("Game state: {}", phase.friendly_name());
    }
}
