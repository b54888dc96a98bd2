use thiserror::Error;

/// Failures of a single topic query exchange.
///
/// None of these are retried by the protocol client; the round status poller
/// counts them toward its failure threshold instead.
#[derive(Error, Debug)]
pub enum TopicError {
    /// Encoded query does not fit the 16-bit size field of the request header.
    ///
    /// Raised before any connection is opened.
    #[error("Query string is too large: packet size {size} exceeds the maximum of {max}")]
    QueryTooLarge {
        /// Size the header would have declared (query bytes + 6)
        size: usize,
        /// Exclusive upper bound for the size field
        max: usize,
    },

    /// Response header echoed a different packet identifier than the request used.
    #[error("Invalid packet identifier in response. Expected {expected:#04x}, got {actual:#04x}")]
    PacketMismatch {
        /// Identifier sent with the request
        expected: u8,
        /// Identifier found in the response header
        actual: u8,
    },

    /// Stream closed (or stalled past the read timeout) before the 5-byte header arrived.
    #[error("Failed to read the response header: got {read} of 5 bytes")]
    TruncatedHeader {
        /// Bytes read before the stream ended
        read: usize,
    },

    /// Stream closed (or stalled past the read timeout) before the declared payload arrived.
    #[error("Truncated response: {read} of {expected} bytes")]
    TruncatedResponse {
        /// Bytes actually read
        read: usize,
        /// Bytes the header announced (after trailer adjustment)
        expected: usize,
    },

    /// Float-tagged payload shorter than an IEEE-754 single.
    #[error("Incorrect length of float response: {0} bytes")]
    InvalidFloat(usize),

    /// Whole exchange exceeded the per-query deadline.
    #[error("Topic query to {address} timed out after {seconds}s")]
    Timeout {
        /// `host:port` of the queried server
        address: String,
        /// Configured deadline in seconds
        seconds: u64,
    },

    /// Connection-level failure (DNS, connect, write, read).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
