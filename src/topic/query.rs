//! URL encoding of topic query arguments and decoding of string responses.

use std::collections::HashMap;

use url::form_urlencoded;

/// Encodes key/value pairs as `key=value` joined with `&`, both sides URL-escaped.
pub fn encode_query<I, K, V>(args: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(args)
        .finish()
}

/// Decodes a `key=value&key2=value2` string into a map.
///
/// Bare keys map to an empty value and later duplicates overwrite earlier ones.
pub fn decode_query(query: &str) -> HashMap<String, String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let query = query.trim_end_matches('\0');

    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use test_utils::fixture::status::{encode_body, lobby_status};

    use super::*;

    /// Tests that escaped values survive an encode/decode round trip.
    ///
    /// Verifies values with trailing spaces and the `&` and `=` separators.
    ///
    /// Expected: decoded map equal to the encoded one
    #[test]
    fn round_trips_escaped_values() {
        let mut args = HashMap::new();
        args.insert("round_id".to_string(), "42".to_string());
        args.insert("players".to_string(), "7 ".to_string());
        args.insert("mode".to_string(), "a&b=c".to_string());

        let encoded = encode_query(&args);
        assert!(!encoded.contains("a&b"));

        assert_eq!(decode_query(&encoded), args);
    }

    /// Tests decoding of bare keys and duplicate keys.
    ///
    /// Expected: bare key maps to "", last duplicate wins
    #[test]
    fn decodes_bare_and_duplicate_keys() {
        let decoded = decode_query("respawn&players=3&players=5");

        assert_eq!(decoded.get("respawn").map(String::as_str), Some(""));
        assert_eq!(decoded.get("players").map(String::as_str), Some("5"));
        assert_eq!(decoded.len(), 2);
    }

    /// Tests that a leading `?` and trailing nulls are ignored.
    ///
    /// Expected: only the real pairs are decoded
    #[test]
    fn ignores_question_mark_and_trailing_nulls() {
        let decoded = decode_query("?version=1.2&map_name=Box%20Station\0");

        assert_eq!(decoded.get("version").map(String::as_str), Some("1.2"));
        assert_eq!(
            decoded.get("map_name").map(String::as_str),
            Some("Box Station")
        );
    }

    /// Tests decoding a fixture body.
    ///
    /// Verifies that status bodies built for the test server decode back into the
    /// same map, including values with spaces and separators.
    ///
    /// Expected: decoded map equal to the fixture map
    #[test]
    fn decodes_fixture_bodies() {
        let mut status = lobby_status("7", 12);
        status.insert("mode".to_string(), "team&deathmatch=on".to_string());

        let body = encode_body(&status);

        assert!(body.contains("map_name=Box+Station"));
        assert_eq!(decode_query(&body), status);
    }
}
