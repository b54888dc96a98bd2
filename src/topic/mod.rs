//! Client for the game server "topic" query protocol.
//!
//! Each query opens its own connection, writes one framed request, reads one framed
//! response and closes the connection again. Nothing is cached between calls and no
//! error is retried here; retry policy belongs to the round status poller.
//!
//! - `packet` - request/response framing and payload decoding
//! - `query` - URL encoding of arguments and string responses
//! - `connector` - transport abstraction (TCP in production)

pub mod connector;
pub mod packet;
pub mod query;

use std::{collections::HashMap, time::Duration};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::{
    error::topic::TopicError,
    topic::{
        connector::{Connector, TcpConnector},
        packet::{ResponseHeader, TopicResponse, RESPONSE_HEADER_LEN},
    },
};

/// Timeout applied to every individual read call.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for a whole query, connect through last payload byte.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Topic protocol client.
///
/// Generic over the transport so tests can run exchanges in memory; production code
/// uses the default `TcpConnector`.
#[derive(Debug, Clone)]
pub struct TopicClient<C = TcpConnector> {
    connector: C,
    read_timeout: Duration,
    query_timeout: Duration,
}

impl TopicClient<TcpConnector> {
    /// Creates a client that talks to game servers over TCP.
    pub fn new() -> Self {
        Self::with_connector(TcpConnector)
    }
}

impl<C: Connector> TopicClient<C> {
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            read_timeout: DEFAULT_READ_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Overrides the timeout armed for each read call.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Overrides the deadline for a complete query.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Sends a raw topic query and returns the decoded response.
    ///
    /// The query is prefixed with `?` if needed and size-checked before any I/O is
    /// attempted.
    ///
    /// # Arguments
    /// - `host` - DNS name or literal address of the game server
    /// - `port` - Port the game server listens on
    /// - `query` - Query string such as `?status`
    ///
    /// # Returns
    /// - `Ok(TopicResponse)` - Response decoded according to its type tag
    /// - `Err(TopicError::QueryTooLarge)` - Query does not fit a single packet
    /// - `Err(TopicError::PacketMismatch)` - Server echoed a different packet id
    /// - `Err(TopicError::TruncatedHeader)` / `Err(TopicError::TruncatedResponse)` -
    ///   Stream ended or stalled before the announced bytes arrived
    /// - `Err(TopicError::InvalidFloat)` - Float payload too short
    /// - `Err(TopicError::Timeout)` - Query exceeded the overall deadline
    /// - `Err(TopicError::Io)` - Connection-level failure
    pub async fn send(
        &self,
        host: &str,
        port: u16,
        query: &str,
    ) -> Result<TopicResponse, TopicError> {
        let query = packet::normalize_query(query);
        let request = packet::encode_request(&query)?;

        match tokio::time::timeout(self.query_timeout, self.exchange(host, port, &request)).await
        {
            Ok(result) => result,
            Err(_) => Err(TopicError::Timeout {
                address: format!("{}:{}", host, port),
                seconds: self.query_timeout.as_secs(),
            }),
        }
    }

    /// Sends URL-encoded key/value arguments as a topic query.
    pub async fn send_args<I, K, V>(
        &self,
        host: &str,
        port: u16,
        args: I,
    ) -> Result<TopicResponse, TopicError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = query::encode_query(args);
        self.send(host, port, &query).await
    }

    /// Requests the server status map.
    ///
    /// # Returns
    /// - `Ok(Some(map))` - Server answered with a string response
    /// - `Ok(None)` - Server answered with any other response type
    /// - `Err(TopicError)` - Exchange failed
    pub async fn query_status(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Option<HashMap<String, String>>, TopicError> {
        match self.send(host, port, "?status").await? {
            TopicResponse::Map(map) => Ok(Some(map)),
            other => {
                tracing::debug!(
                    "Unexpected response type {:#04x} to ?status",
                    other.response_type()
                );
                Ok(None)
            }
        }
    }

    /// Requests the number of connected players.
    ///
    /// # Returns
    /// - `Ok(Some(count))` - Float response truncated to an integer and stringified
    /// - `Ok(None)` - Server answered with any other response type
    /// - `Err(TopicError)` - Exchange failed
    pub async fn query_player_count(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Option<String>, TopicError> {
        match self.send(host, port, "?playing").await? {
            TopicResponse::Float(value) => Ok(Some((value as i32).to_string())),
            _ => Ok(None),
        }
    }

    /// Runs one request/response exchange on a fresh connection.
    ///
    /// The stream is dropped, closing the connection, whether or not decoding succeeds.
    async fn exchange(
        &self,
        host: &str,
        port: u16,
        request: &[u8],
    ) -> Result<TopicResponse, TopicError> {
        let mut stream = self.connector.connect(host, port).await?;

        stream.write_all(request).await?;
        stream.flush().await?;

        let mut header = [0u8; RESPONSE_HEADER_LEN];
        let read = read_full(&mut stream, &mut header, self.read_timeout).await?;
        if read < RESPONSE_HEADER_LEN {
            return Err(TopicError::TruncatedHeader { read });
        }

        let header = ResponseHeader::parse(&header);
        header.validate()?;

        let expected = header.payload_len();
        let mut payload = vec![0u8; expected];
        let read = read_full(&mut stream, &mut payload, self.read_timeout).await?;
        drop(stream);

        if read < expected {
            return Err(TopicError::TruncatedResponse { read, expected });
        }

        packet::decode_payload(header.response_type, payload)
    }
}

/// Reads until `buf` is full, the stream ends, or a single read stalls.
///
/// The timeout is re-armed for every read call. A read that times out is treated the
/// same as end of stream, so the caller sees a short count either way.
async fn read_full<S>(stream: &mut S, buf: &mut [u8], timeout: Duration) -> std::io::Result<usize>
where
    S: AsyncRead + Unpin,
{
    let mut total = 0;

    while total < buf.len() {
        match tokio::time::timeout(timeout, stream.read(&mut buf[total..])).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => total += n,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                tracing::debug!("Topic read timed out after {} of {} bytes", total, buf.len());
                break;
            }
        }
    }

    Ok(total)
}
