//! Structured projection of a `?status` response.

use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    error::status::StatusError,
    model::game_phase::GamePhase,
    util::parse::{
        flag_field, fractional_seconds_field, int_field, parse_seconds, seconds_field,
        string_field, timestamp_field,
    },
};

const ROUND_DURATION: &str = "round_duration";
const GAMESTATE: &str = "gamestate";

/// Decoded server status.
///
/// Every field has a fallback so a sparse response still produces a record. Only
/// the phase is strict: a `gamestate` value that is present but unknown fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerStatus {
    pub version: String,
    pub mode: String,
    pub host: String,
    pub round_id: String,
    pub revision: String,
    pub map_name: String,
    pub security_level: String,
    pub respawn: bool,
    pub enter: bool,
    pub vote: bool,
    pub ai: bool,
    pub players: i64,
    pub admins: i64,
    pub popcap: i64,
    pub soft_popcap: i64,
    pub hard_popcap: i64,
    pub extreme_popcap: i64,
    pub revision_date: DateTime<Utc>,
    pub gamestate: GamePhase,
    pub round_duration: Duration,
    pub time_dilation_current: Duration,
    pub time_dilation_avg: Duration,
    pub time_dilation_avg_slow: Duration,
    pub time_dilation_avg_fast: Duration,
}

impl Default for ServerStatus {
    fn default() -> Self {
        Self {
            version: String::new(),
            mode: String::new(),
            host: String::new(),
            round_id: String::new(),
            revision: String::new(),
            map_name: String::new(),
            security_level: String::new(),
            respawn: false,
            enter: false,
            vote: false,
            ai: false,
            players: -1,
            admins: -1,
            popcap: -1,
            soft_popcap: -1,
            hard_popcap: -1,
            extreme_popcap: -1,
            revision_date: DateTime::<Utc>::MIN_UTC,
            gamestate: GamePhase::Unknown,
            round_duration: Duration::ZERO,
            time_dilation_current: Duration::ZERO,
            time_dilation_avg: Duration::ZERO,
            time_dilation_avg_slow: Duration::ZERO,
            time_dilation_avg_fast: Duration::ZERO,
        }
    }
}

impl ServerStatus {
    /// Builds a status record from a decoded `?status` map.
    ///
    /// # Returns
    /// - `Ok(ServerStatus)` - Record with defaults for every missing or malformed field
    /// - `Err(StatusError::UnknownPhase)` - `gamestate` is present but not a known phase
    pub fn from_query(map: &HashMap<String, String>) -> Result<Self, StatusError> {
        let gamestate = match map.get(GAMESTATE) {
            Some(value) => value.parse()?,
            None => GamePhase::Unknown,
        };

        Ok(Self {
            version: string_field(map, "version"),
            mode: string_field(map, "mode"),
            host: string_field(map, "host"),
            round_id: string_field(map, "round_id"),
            revision: string_field(map, "revision"),
            map_name: string_field(map, "map_name"),
            security_level: string_field(map, "security_level"),
            respawn: flag_field(map, "respawn"),
            enter: flag_field(map, "enter"),
            vote: flag_field(map, "vote"),
            ai: flag_field(map, "ai"),
            players: int_field(map, "players"),
            admins: int_field(map, "admins"),
            popcap: int_field(map, "popcap"),
            soft_popcap: int_field(map, "soft_popcap"),
            hard_popcap: int_field(map, "hard_popcap"),
            extreme_popcap: int_field(map, "extreme_popcap"),
            revision_date: timestamp_field(map, "revision_date"),
            gamestate,
            round_duration: seconds_field(map, ROUND_DURATION),
            time_dilation_current: fractional_seconds_field(map, "time_dilation_current"),
            time_dilation_avg: fractional_seconds_field(map, "time_dilation_avg"),
            time_dilation_avg_slow: fractional_seconds_field(map, "time_dilation_avg_slow"),
            time_dilation_avg_fast: fractional_seconds_field(map, "time_dilation_avg_fast"),
        })
    }
}

/// Extracts the two fields the poller cannot work without.
///
/// # Returns
/// - `Ok((Duration, GamePhase))` - Round duration and classified phase
/// - `Err(StatusError::MissingField)` - `round_duration` or `gamestate` is absent
/// - `Err(StatusError::InvalidField)` - `round_duration` is not a whole number of seconds
/// - `Err(StatusError::UnknownPhase)` - `gamestate` is not a known phase
pub fn required_fields(
    map: &HashMap<String, String>,
) -> Result<(Duration, GamePhase), StatusError> {
    let duration = map
        .get(ROUND_DURATION)
        .ok_or(StatusError::MissingField(ROUND_DURATION))?;
    let phase = map
        .get(GAMESTATE)
        .ok_or(StatusError::MissingField(GAMESTATE))?;

    let duration = parse_seconds(duration).ok_or_else(|| StatusError::InvalidField {
        field: ROUND_DURATION,
        value: duration.clone(),
    })?;

    Ok((duration, phase.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixture::status::{in_game_status, status_map};

    /// Tests status parsing of a full response.
    ///
    /// Verifies that strings, flags, counts, durations and the phase are projected.
    ///
    /// Expected: all fields reflect the fixture values
    #[test]
    fn parses_full_status() {
        let map = in_game_status("17", 42, 3725);

        let status = ServerStatus::from_query(&map).unwrap();

        assert_eq!(status.round_id, "17");
        assert_eq!(status.players, 42);
        assert_eq!(status.gamestate, GamePhase::InGame);
        assert_eq!(status.round_duration, Duration::from_secs(3725));
        assert_eq!(status.map_name, "Box Station");
        assert!(status.respawn);
        assert!(!status.ai);
        assert_eq!(status.time_dilation_avg, Duration::from_millis(250));
    }

    /// Tests status parsing without a players key.
    ///
    /// Verifies that missing counts default instead of failing.
    ///
    /// Expected: players == -1
    #[test]
    fn missing_players_defaults_to_minus_one() {
        let map = status_map(&[("round_id", "5"), ("gamestate", "1")]);

        let status = ServerStatus::from_query(&map).unwrap();

        assert_eq!(status.players, -1);
        assert_eq!(status.gamestate, GamePhase::Lobby1);
        assert_eq!(status.round_duration, Duration::ZERO);
    }

    /// Tests status parsing of an empty map.
    ///
    /// Expected: equals the default record
    #[test]
    fn empty_map_is_default() {
        let status = ServerStatus::from_query(&HashMap::new()).unwrap();

        assert_eq!(status, ServerStatus::default());
    }

    /// Tests status parsing with an unknown game state.
    ///
    /// Expected: Err(UnknownPhase)
    #[test]
    fn unknown_gamestate_fails() {
        let map = status_map(&[("gamestate", "lunch")]);

        assert_eq!(
            ServerStatus::from_query(&map),
            Err(StatusError::UnknownPhase("lunch".to_string()))
        );
    }

    /// Tests required field extraction.
    ///
    /// Verifies each failure mode of the required pair.
    ///
    /// Expected: MissingField for either absent key, InvalidField for a bad duration
    #[test]
    fn required_fields_errors() {
        let no_duration = status_map(&[("gamestate", "3")]);
        let no_state = status_map(&[("round_duration", "10")]);
        let bad_duration = status_map(&[("round_duration", "ten"), ("gamestate", "3")]);

        assert_eq!(
            required_fields(&no_duration),
            Err(StatusError::MissingField("round_duration"))
        );
        assert_eq!(
            required_fields(&no_state),
            Err(StatusError::MissingField("gamestate"))
        );
        assert_eq!(
            required_fields(&bad_duration),
            Err(StatusError::InvalidField {
                field: "round_duration",
                value: "ten".to_string()
            })
        );
    }

    /// Tests required field extraction on a valid map.
    ///
    /// Expected: Ok((90s, InGame))
    #[test]
    fn required_fields_ok() {
        let map = in_game_status("1", 3, 90);

        assert_eq!(
            required_fields(&map),
            Ok((Duration::from_secs(90), GamePhase::InGame))
        );
    }
}
