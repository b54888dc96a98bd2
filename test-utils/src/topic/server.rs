use std::{collections::VecDeque, net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::Mutex,
};

use crate::error::TestError;

/// Local topic server replying with scripted frames.
///
/// Each accepted connection reads one request, records it, writes the next scripted
/// response verbatim and closes. Once the script is exhausted connections are closed
/// without a reply.
pub struct TopicTestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl TopicTestServer {
    /// Binds to `127.0.0.1:0` and starts serving in a background task.
    ///
    /// # Arguments
    /// - `responses` - Raw bytes to send, one entry per connection in order
    pub async fn start(responses: Vec<Vec<u8>>) -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let mut script = VecDeque::from(responses);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = match read_request(&mut socket).await {
                    Ok(request) => request,
                    Err(_) => continue,
                };
                recorded.lock().await.push(request);

                if let Some(response) = script.pop_front() {
                    let _ = socket.write_all(&response).await;
                    let _ = socket.flush().await;
                }
                let _ = socket.shutdown().await;
            }
        });

        Ok(Self { addr, requests })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Complete request packets received so far.
    pub async fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().await.clone()
    }

    /// Query strings of the received requests, without framing or terminator.
    pub async fn queries(&self) -> Vec<String> {
        self.requests()
            .await
            .iter()
            .filter(|request| request.len() > 10)
            .map(|request| String::from_utf8_lossy(&request[9..request.len() - 1]).into_owned())
            .collect()
    }
}

/// Reads one request packet using its size field.
///
/// The size field counts the query plus 6, so `size` more bytes follow the first 4.
async fn read_request(socket: &mut tokio::net::TcpStream) -> std::io::Result<Vec<u8>> {
    let mut header = [0u8; 4];
    socket.read_exact(&mut header).await?;

    let size = u16::from_be_bytes([header[2], header[3]]) as usize;
    let mut rest = vec![0u8; size];
    socket.read_exact(&mut rest).await?;

    let mut request = header.to_vec();
    request.extend_from_slice(&rest);
    Ok(request)
}
