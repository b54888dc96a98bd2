//! Byte-level framing of topic requests and responses.
//!
//! A request is a 9-byte header followed by the query string and a null terminator:
//!
//! ```text
//! [0x00][0x83][size_hi][size_lo][0x00 x5][query bytes...][0x00]
//! ```
//!
//! where `size` is the UTF-8 length of the query plus 6. A response starts with a
//! 5-byte header `[reserved][0x83][len_hi][len_lo][type]` followed by a payload whose
//! shape depends on `type`.

use std::{borrow::Cow, collections::HashMap};

use crate::{error::topic::TopicError, topic::query};

/// Packet identifier used on requests and echoed back on responses.
pub const PACKET_ID: u8 = 0x83;

/// Response type tag for a URL-encoded `key=value` payload.
pub const RESPONSE_STRING: u8 = 0x06;

/// Response type tag for a little-endian `f32` payload.
pub const RESPONSE_FLOAT: u8 = 0x2A;

/// Fixed length of the request header preceding the query bytes.
pub const REQUEST_HEADER_LEN: usize = 9;

/// Fixed length of the response header preceding the payload.
pub const RESPONSE_HEADER_LEN: usize = 5;

/// Exclusive upper bound of the request size field.
pub const MAX_PACKET_SIZE: usize = 65535;

/// Bytes the size field counts on top of the query itself.
const SIZE_OVERHEAD: usize = 6;

/// Decoded body of a topic response.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicResponse {
    /// `0x06` payload decoded into key/value pairs.
    Map(HashMap<String, String>),
    /// `0x2A` payload decoded as an IEEE-754 single.
    Float(f32),
    /// Any other tag, passed through uninterpreted.
    Raw {
        /// Type tag from the response header
        response_type: u8,
        /// Payload bytes as read
        data: Vec<u8>,
    },
}

impl TopicResponse {
    /// Returns the response type tag this payload was decoded from.
    pub fn response_type(&self) -> u8 {
        match self {
            Self::Map(_) => RESPONSE_STRING,
            Self::Float(_) => RESPONSE_FLOAT,
            Self::Raw { response_type, .. } => *response_type,
        }
    }
}

/// Prepends `?` to the query unless it already starts with one.
pub fn normalize_query(query: &str) -> Cow<'_, str> {
    if query.starts_with('?') {
        Cow::Borrowed(query)
    } else {
        Cow::Owned(format!("?{}", query))
    }
}

/// Builds the request packet for an already normalized query.
///
/// # Returns
/// - `Ok(Vec<u8>)` - Complete packet ready to be written to the socket
/// - `Err(TopicError::QueryTooLarge)` - Query would overflow the 16-bit size field
pub fn encode_request(query: &str) -> Result<Vec<u8>, TopicError> {
    let query_bytes = query.as_bytes();
    let size = query_bytes.len() + SIZE_OVERHEAD;

    if size >= MAX_PACKET_SIZE {
        return Err(TopicError::QueryTooLarge {
            size,
            max: MAX_PACKET_SIZE,
        });
    }

    let mut packet = Vec::with_capacity(REQUEST_HEADER_LEN + query_bytes.len() + 1);
    packet.push(0x00);
    packet.push(PACKET_ID);
    packet.extend_from_slice(&(size as u16).to_be_bytes());
    packet.extend_from_slice(&[0x00; 5]);
    packet.extend_from_slice(query_bytes);
    packet.push(0x00);

    Ok(packet)
}

/// Parsed 5-byte response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub packet_id: u8,
    /// Declared content length, including the type byte and trailer.
    pub content_len: u16,
    pub response_type: u8,
}

impl ResponseHeader {
    pub fn parse(bytes: &[u8; RESPONSE_HEADER_LEN]) -> Self {
        Self {
            packet_id: bytes[1],
            content_len: u16::from_be_bytes([bytes[2], bytes[3]]),
            response_type: bytes[4],
        }
    }

    /// Rejects headers that do not echo the request's packet identifier.
    pub fn validate(&self) -> Result<(), TopicError> {
        if self.packet_id != PACKET_ID {
            return Err(TopicError::PacketMismatch {
                expected: PACKET_ID,
                actual: self.packet_id,
            });
        }

        Ok(())
    }

    /// Number of payload bytes to read after the header.
    ///
    /// The declared length overshoots the payload by 2 for string responses and by 1
    /// for float responses. Neither adjustment is documented by the protocol; both are
    /// kept exactly as observed from live servers.
    pub fn payload_len(&self) -> usize {
        let trailer = match self.response_type {
            RESPONSE_STRING => 2,
            RESPONSE_FLOAT => 1,
            _ => 0,
        };

        (self.content_len as usize).saturating_sub(trailer)
    }
}

/// Decodes a payload according to its response type tag.
///
/// # Returns
/// - `Ok(TopicResponse::Map)` - String payload split into key/value pairs
/// - `Ok(TopicResponse::Float)` - First four bytes read as little-endian `f32`
/// - `Ok(TopicResponse::Raw)` - Unknown tag, bytes passed through
/// - `Err(TopicError::InvalidFloat)` - Float payload shorter than 4 bytes
pub fn decode_payload(response_type: u8, payload: Vec<u8>) -> Result<TopicResponse, TopicError> {
    match response_type {
        RESPONSE_STRING => {
            let text = String::from_utf8_lossy(&payload);
            Ok(TopicResponse::Map(query::decode_query(&text)))
        }
        RESPONSE_FLOAT => {
            let bytes: [u8; 4] = payload
                .get(..4)
                .and_then(|b| b.try_into().ok())
                .ok_or(TopicError::InvalidFloat(payload.len()))?;
            Ok(TopicResponse::Float(f32::from_le_bytes(bytes)))
        }
        _ => Ok(TopicResponse::Raw {
            response_type,
            data: payload,
        }),
    }
}

/// Splits an encoded request back into its size field and query bytes.
#[cfg(test)]
pub fn parse_request(packet: &[u8]) -> Option<(u16, &[u8])> {
    if packet.len() < REQUEST_HEADER_LEN + 1 || packet[1] != PACKET_ID {
        return None;
    }
    let size = u16::from_be_bytes([packet[2], packet[3]]);
    let query = &packet[REQUEST_HEADER_LEN..packet.len() - 1];
    Some((size, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that the request header carries the query length plus 6.
    ///
    /// Verifies header layout byte by byte for `?status`.
    ///
    /// Expected: Ok with 2 padding/id bytes, size 13, 5 zero bytes, query, null
    #[test]
    fn encodes_status_request_layout() {
        let packet = encode_request("?status").unwrap();

        assert_eq!(
            packet,
            vec![
                0x00, 0x83, 0x00, 0x0D, 0x00, 0x00, 0x00, 0x00, 0x00, b'?', b's', b't', b'a',
                b't', b'u', b's', 0x00
            ]
        );
    }

    /// Tests that size field and query bytes survive a header round trip.
    ///
    /// Verifies several query lengths, including multi-byte UTF-8 and a length that
    /// needs the high byte of the size field.
    ///
    /// Expected: Ok with recovered size equal to byte length + 6 and identical bytes
    #[test]
    fn request_header_recovers_size_and_query() {
        let long = format!("?{}", "x".repeat(4000));
        for query in ["?status", "?playing", "?ключ=значение", long.as_str()] {
            let packet = encode_request(query).unwrap();
            let (size, bytes) = parse_request(&packet).unwrap();

            assert_eq!(size as usize, query.len() + 6);
            assert_eq!(bytes, query.as_bytes());
        }
    }

    /// Tests the size limit boundary.
    ///
    /// A query of 65528 bytes gives size 65534 which fits; one more byte reaches
    /// the limit and must be rejected.
    ///
    /// Expected: Ok for 65528 bytes, Err(QueryTooLarge) for 65529 bytes
    #[test]
    fn rejects_query_at_size_limit() {
        let fits = "a".repeat(MAX_PACKET_SIZE - 7);
        assert!(encode_request(&fits).is_ok());

        let too_large = "a".repeat(MAX_PACKET_SIZE - 6);
        let result = encode_request(&too_large);
        assert!(matches!(
            result,
            Err(TopicError::QueryTooLarge { size: 65535, .. })
        ));
    }

    /// Tests query normalization.
    ///
    /// Expected: `?` added once, never duplicated
    #[test]
    fn normalizes_leading_question_mark() {
        assert_eq!(normalize_query("status"), "?status");
        assert_eq!(normalize_query("?status"), "?status");
        assert_eq!(normalize_query(""), "?");
    }

    /// Tests payload length adjustment per response type.
    ///
    /// Expected: L-2 for strings, L-1 for floats, L otherwise
    #[test]
    fn payload_len_subtracts_type_trailer() {
        let header = |response_type| ResponseHeader {
            packet_id: PACKET_ID,
            content_len: 20,
            response_type,
        };

        assert_eq!(header(RESPONSE_STRING).payload_len(), 18);
        assert_eq!(header(RESPONSE_FLOAT).payload_len(), 19);
        assert_eq!(header(0x00).payload_len(), 20);
    }

    /// Tests header parsing and packet identifier validation.
    ///
    /// Expected: Ok for 0x83, Err(PacketMismatch) for anything else
    #[test]
    fn validates_echoed_packet_id() {
        let header = ResponseHeader::parse(&[0x00, 0x83, 0x01, 0x02, 0x06]);
        assert_eq!(header.content_len, 0x0102);
        assert_eq!(header.response_type, RESPONSE_STRING);
        assert!(header.validate().is_ok());

        let header = ResponseHeader::parse(&[0x00, 0x84, 0x00, 0x05, 0x2A]);
        assert!(matches!(
            header.validate(),
            Err(TopicError::PacketMismatch {
                expected: 0x83,
                actual: 0x84
            })
        ));
    }

    /// Tests float payload decoding.
    ///
    /// Expected: 12.0f little-endian decodes to 12.0; 3 bytes fail with InvalidFloat
    #[test]
    fn decodes_float_payload() {
        let response = decode_payload(RESPONSE_FLOAT, 12.0f32.to_le_bytes().to_vec()).unwrap();
        assert_eq!(response, TopicResponse::Float(12.0));

        let result = decode_payload(RESPONSE_FLOAT, vec![0x00, 0x00, 0x40]);
        assert!(matches!(result, Err(TopicError::InvalidFloat(3))));
    }

    /// Tests that unknown response tags pass bytes through.
    ///
    /// Expected: Raw response with the received tag and bytes
    #[test]
    fn passes_unknown_payload_through() {
        let response = decode_payload(0x00, vec![1, 2, 3]).unwrap();
        assert_eq!(response.response_type(), 0x00);
        assert_eq!(
            response,
            TopicResponse::Raw {
                response_type: 0x00,
                data: vec![1, 2, 3]
            }
        );
    }
}
