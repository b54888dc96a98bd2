//! Status response fixtures.
//!
//! Maps shaped like a decoded `?status` topic response, plus the matching
//! URL-encoded bodies for feeding a [`TopicTestServer`](crate::topic::server::TopicTestServer).

use std::collections::HashMap;

use url::form_urlencoded;

/// Default map name reported by the fixtures.
pub const DEFAULT_MAP_NAME: &str = "Box Station";

/// Builds a status map from literal pairs.
pub fn status_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Creates a complete status map for the given phase code.
///
/// # Default Values
/// - version: `"515.1630"`
/// - mode: `"secret"`
/// - map_name: `"Box Station"`
/// - security_level: `"green"`
/// - respawn: `"1"`, enter: `"1"`, vote: `"0"`, ai: `"0"`
/// - admins: `"2"`, popcap: `"80"`
/// - revision_date: `"2024-03-01"`
/// - time_dilation_*: `"0.25"`
///
/// # Arguments
/// - `gamestate` - Numeric phase code (0 startup, 1/2 lobby, 3 in game, 4 end game)
/// - `round_id` - Round identifier
/// - `players` - Connected player count
/// - `round_duration` - Elapsed round time in seconds
pub fn phase_status(
    gamestate: i32,
    round_id: &str,
    players: i64,
    round_duration: u64,
) -> HashMap<String, String> {
    let mut map = status_map(&[
        ("version", "515.1630"),
        ("mode", "secret"),
        ("map_name", DEFAULT_MAP_NAME),
        ("security_level", "green"),
        ("respawn", "1"),
        ("enter", "1"),
        ("vote", "0"),
        ("ai", "0"),
        ("admins", "2"),
        ("popcap", "80"),
        ("revision_date", "2024-03-01"),
        ("time_dilation_current", "0.25"),
        ("time_dilation_avg", "0.25"),
        ("time_dilation_avg_slow", "0.25"),
        ("time_dilation_avg_fast", "0.25"),
    ]);

    map.insert("gamestate".to_string(), gamestate.to_string());
    map.insert("round_id".to_string(), round_id.to_string());
    map.insert("players".to_string(), players.to_string());
    map.insert("round_duration".to_string(), round_duration.to_string());

    map
}

pub fn startup_status(round_id: &str) -> HashMap<String, String> {
    phase_status(0, round_id, 0, 0)
}

pub fn lobby_status(round_id: &str, players: i64) -> HashMap<String, String> {
    phase_status(1, round_id, players, 0)
}

pub fn in_game_status(round_id: &str, players: i64, round_duration: u64) -> HashMap<String, String> {
    phase_status(3, round_id, players, round_duration)
}

pub fn end_game_status(round_id: &str, players: i64, round_duration: u64) -> HashMap<String, String> {
    phase_status(4, round_id, players, round_duration)
}

/// URL-encodes a status map into a response body.
///
/// Keys are sorted so the body is deterministic.
pub fn encode_body(map: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = map.iter().collect();
    pairs.sort();

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
