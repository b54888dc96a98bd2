//! Phase-specific content for the round status embed.
//!
//! Only data selection lives here; the Discord embed itself is assembled by the
//! round status channel.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{
    error::round_status::RoundStatusError,
    model::{game_phase::GamePhase, status::ServerStatus},
};

/// Content shown for a single observed phase.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusDisplay {
    Startup {
        round_id: String,
    },
    Lobby {
        round_id: String,
        players: i64,
    },
    InGame {
        round_id: String,
        players: i64,
        /// Round time as `HH:MM`
        round_time: String,
    },
    EndGame {
        finished_at: DateTime<Utc>,
        round_id: String,
    },
}

impl StatusDisplay {
    /// Selects the content for the phase recorded in `status`.
    ///
    /// `now` is the wall-clock time of detection, used as the completion time of an
    /// ended round.
    ///
    /// # Returns
    /// - `Ok(StatusDisplay)` - Content for a renderable phase
    /// - `Err(RoundStatusError::UnrenderablePhase)` - Phase is `Unknown`
    pub fn from_status(status: &ServerStatus, now: DateTime<Utc>) -> Result<Self, RoundStatusError> {
        let round_id = status.round_id.clone();

        match status.gamestate {
            GamePhase::Startup => Ok(Self::Startup { round_id }),
            GamePhase::Lobby1 | GamePhase::Lobby2 => Ok(Self::Lobby {
                round_id,
                players: status.players,
            }),
            GamePhase::InGame => Ok(Self::InGame {
                round_id,
                players: status.players,
                round_time: format_round_time(status.round_duration),
            }),
            GamePhase::EndGame => Ok(Self::EndGame {
                finished_at: now,
                round_id,
            }),
            GamePhase::Unknown => Err(RoundStatusError::UnrenderablePhase(status.gamestate)),
        }
    }

    pub fn phase_label(&self) -> &'static str {
        match self {
            Self::Startup { .. } => GamePhase::Startup.friendly_name(),
            Self::Lobby { .. } => GamePhase::Lobby1.friendly_name(),
            Self::InGame { .. } => GamePhase::InGame.friendly_name(),
            Self::EndGame { .. } => GamePhase::EndGame.friendly_name(),
        }
    }
}

/// Display content plus whether it is the final offline rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub display: StatusDisplay,
    /// Set on the shutdown re-render of the last known status.
    pub offline: bool,
}

impl StatusView {
    pub fn live(display: StatusDisplay) -> Self {
        Self {
            display,
            offline: false,
        }
    }

    pub fn offline(display: StatusDisplay) -> Self {
        Self {
            display,
            offline: true,
        }
    }
}

/// Formats a round duration as zero-padded `HH:MM` of total hours and minutes.
pub fn format_round_time(duration: Duration) -> String {
    let minutes = duration.as_secs() / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(phase: GamePhase) -> ServerStatus {
        ServerStatus {
            round_id: "77".to_string(),
            players: 12,
            gamestate: phase,
            round_duration: Duration::from_secs(2 * 3600 + 5 * 60 + 59),
            ..Default::default()
        }
    }

    /// Tests content selection for every renderable phase.
    ///
    /// Verifies that each phase carries only the data it shows.
    ///
    /// Expected: Startup has the round id, Lobby adds players, InGame adds round time,
    /// EndGame carries the detection time
    #[test]
    fn selects_content_per_phase() {
        let now = Utc::now();

        assert_eq!(
            StatusDisplay::from_status(&status(GamePhase::Startup), now).unwrap(),
            StatusDisplay::Startup {
                round_id: "77".to_string()
            }
        );
        assert_eq!(
            StatusDisplay::from_status(&status(GamePhase::Lobby2), now).unwrap(),
            StatusDisplay::Lobby {
                round_id: "77".to_string(),
                players: 12
            }
        );
        assert_eq!(
            StatusDisplay::from_status(&status(GamePhase::InGame), now).unwrap(),
            StatusDisplay::InGame {
                round_id: "77".to_string(),
                players: 12,
                round_time: "02:05".to_string()
            }
        );
        assert_eq!(
            StatusDisplay::from_status(&status(GamePhase::EndGame), now).unwrap(),
            StatusDisplay::EndGame {
                finished_at: now,
                round_id: "77".to_string()
            }
        );
    }

    /// Tests content selection for the Unknown phase.
    ///
    /// Expected: Err(UnrenderablePhase)
    #[test]
    fn unknown_phase_is_unrenderable() {
        let result = StatusDisplay::from_status(&status(GamePhase::Unknown), Utc::now());

        assert!(matches!(
            result,
            Err(RoundStatusError::UnrenderablePhase(GamePhase::Unknown))
        ));
    }

    /// Tests round time formatting.
    ///
    /// Verifies zero padding and that hours are not wrapped at a day.
    ///
    /// Expected: "00:00", "01:01", "25:00"
    #[test]
    fn formats_round_time() {
        assert_eq!(format_round_time(Duration::ZERO), "00:00");
        assert_eq!(format_round_time(Duration::from_secs(3660)), "01:01");
        assert_eq!(format_round_time(Duration::from_secs(25 * 3600)), "25:00");
    }
}
