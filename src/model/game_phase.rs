use std::{fmt, str::FromStr};

use crate::error::status::StatusError;

/// Coarse round lifecycle classification reported by the `gamestate` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    /// No observation yet, or the display was torn down after repeated failures.
    #[default]
    Unknown,
    Startup,
    Lobby1,
    Lobby2,
    InGame,
    EndGame,
}

impl GamePhase {
    const ALL: [GamePhase; 6] = [
        GamePhase::Unknown,
        GamePhase::Startup,
        GamePhase::Lobby1,
        GamePhase::Lobby2,
        GamePhase::InGame,
        GamePhase::EndGame,
    ];

    /// Numeric code the game server uses for this phase.
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => -1337,
            Self::Startup => 0,
            Self::Lobby1 => 1,
            Self::Lobby2 => 2,
            Self::InGame => 3,
            Self::EndGame => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.code() == code)
    }

    /// Human readable label used in logs and the offline status line.
    pub fn friendly_name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Startup => "Server startup",
            Self::Lobby1 | Self::Lobby2 => "Lobby",
            Self::InGame => "Round in progress",
            Self::EndGame => "Round over",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Startup => "Startup",
            Self::Lobby1 => "Lobby1",
            Self::Lobby2 => "Lobby2",
            Self::InGame => "InGame",
            Self::EndGame => "EndGame",
        }
    }
}

impl FromStr for GamePhase {
    type Err = StatusError;

    /// Accepts either the numeric code or the variant name, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();

        if let Ok(code) = trimmed.parse::<i32>() {
            return Self::from_code(code).ok_or_else(|| StatusError::UnknownPhase(value.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StatusError::UnknownPhase(value.to_string()))
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests phase parsing from numeric codes.
    ///
    /// Verifies that every wire code maps to its phase and unknown codes are rejected.
    ///
    /// Expected: 0..=4 map to Startup..EndGame, 9 fails with UnknownPhase
    #[test]
    fn parses_numeric_codes() {
        assert_eq!("0".parse::<GamePhase>(), Ok(GamePhase::Startup));
        assert_eq!("1".parse::<GamePhase>(), Ok(GamePhase::Lobby1));
        assert_eq!("2".parse::<GamePhase>(), Ok(GamePhase::Lobby2));
        assert_eq!("3".parse::<GamePhase>(), Ok(GamePhase::InGame));
        assert_eq!("4".parse::<GamePhase>(), Ok(GamePhase::EndGame));
        assert_eq!(
            "9".parse::<GamePhase>(),
            Err(StatusError::UnknownPhase("9".to_string()))
        );
    }

    /// Tests phase parsing from names.
    ///
    /// Verifies that names are matched case-insensitively and garbage is rejected.
    ///
    /// Expected: "ingame" -> InGame, "ENDGAME" -> EndGame, "running" fails
    #[test]
    fn parses_names_ignoring_case() {
        assert_eq!("ingame".parse::<GamePhase>(), Ok(GamePhase::InGame));
        assert_eq!("ENDGAME".parse::<GamePhase>(), Ok(GamePhase::EndGame));
        assert!("running".parse::<GamePhase>().is_err());
    }

    /// Tests the friendly names of the lobby sub-variants.
    ///
    /// Expected: both read "Lobby"
    #[test]
    fn lobby_variants_share_name() {
        assert_eq!(GamePhase::Lobby1.friendly_name(), "Lobby");
        assert_eq!(GamePhase::Lobby2.friendly_name(), "Lobby");
        assert_ne!(GamePhase::Startup.friendly_name(), "Lobby");
    }
}
