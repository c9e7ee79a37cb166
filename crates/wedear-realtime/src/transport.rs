//! Transport abstraction and the `tokio-tungstenite` implementation.
//!
//! The client only needs two things from a transport: open a connection to a
//! URL, then read text messages from it until it closes. Keeping that behind
//! [`Transport`] lets tests drive the connection lifecycle without sockets.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};
use url::Url;

use crate::errors::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens connections to the message server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the handshake with `url`.
    async fn open(&self, url: &Url) -> Result<Box<dyn Connection>, TransportError>;
}

/// One live connection.
#[async_trait]
pub trait Connection: Send {
    /// Next text message. `None` once the connection has closed.
    async fn recv(&mut self) -> Option<Result<String, TransportError>>;

    /// Close the connection. Errors are ignored.
    async fn close(&mut self);
}

/// WebSocket transport over `tokio-tungstenite`.
#[derive(Clone, Debug)]
pub struct WsTransport {
    connect_timeout: Duration,
}

impl WsTransport {
    /// Create a transport whose handshakes give up after `connect_timeout`.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn open(&self, url: &Url) -> Result<Box<dyn Connection>, TransportError> {
        let timeout_ms = u64::try_from(self.connect_timeout.as_millis()).unwrap_or(u64::MAX);
        let (stream, response) = tokio::time::timeout(self.connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.to_string(),
                timeout_ms,
            })?
            .map_err(|e| TransportError::Handshake {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        debug!(status = %response.status(), "websocket handshake complete");
        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WsStream,
}

#[async_trait]
impl Connection for WsConnection {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(TransportError::Connection(e.to_string()))),
            };
            match message {
                Message::Text(text) => return Some(Ok(text.as_str().to_owned())),
                Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => debug!(len = bytes.len(), "ignoring non-UTF-8 binary message"),
                },
                Message::Close(frame) => {
                    debug!(?frame, "server closed websocket");
                    return None;
                }
                // tungstenite answers pings itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                    trace!("control frame");
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "websocket close failed");
        }
    }
}
