//! Raw response frame builders.
//!
//! Frames mirror what a live game server sends, including the unexplained trailer
//! bytes counted by the declared length.

const PACKET_ID: u8 = 0x83;

/// Builds a string (`0x06`) response.
///
/// The declared length is `body + 2`; the body is followed by a single null byte.
pub fn string_response(body: &str) -> Vec<u8> {
    let mut payload = body.as_bytes().to_vec();
    payload.push(0x00);
    frame(0x06, (body.len() + 2) as u16, &payload)
}

/// Builds a float (`0x2A`) response with declared length 5.
pub fn float_response(value: f32) -> Vec<u8> {
    frame(0x2A, 5, &value.to_le_bytes())
}

/// Builds a response with an arbitrary tag whose declared length equals the payload.
pub fn raw_response(response_type: u8, payload: &[u8]) -> Vec<u8> {
    frame(response_type, payload.len() as u16, payload)
}

/// Builds a frame from its parts without any consistency checks.
pub fn frame(response_type: u8, declared_len: u16, payload: &[u8]) -> Vec<u8> {
    frame_with_id(PACKET_ID, response_type, declared_len, payload)
}

/// Builds a frame that echoes a different packet identifier.
pub fn frame_with_id(packet_id: u8, response_type: u8, declared_len: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(5 + payload.len());
    frame.push(0x00);
    frame.push(packet_id);
    frame.extend_from_slice(&declared_len.to_be_bytes());
    frame.push(response_type);
    frame.extend_from_slice(payload);
    frame
}
