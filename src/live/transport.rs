//! Transport seam of the live channel.
//!
//! The channel only needs "connect", "send a text frame" and "wait for the
//! next text frame", so tests can script connections without a socket.

use futures::{SinkExt, StreamExt};
use std::future::Future;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, trace};

use crate::error::AppError;

pub trait PushConnection: Send {
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Next text frame, `None` once the peer closed the connection
    fn next_text(&mut self) -> impl Future<Output = Option<Result<String, AppError>>> + Send;
}

pub trait PushTransport: Send + Sync {
    type Connection: PushConnection;

    fn connect(&self) -> impl Future<Output = Result<Self::Connection, AppError>> + Send;
}

/// WebSocket transport over `tokio-tungstenite`
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct WebSocketConnection {
    url: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushTransport for WebSocketTransport {
    type Connection = WebSocketConnection;

    async fn connect(&self) -> Result<WebSocketConnection, AppError> {
        let (stream, response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| AppError::live_channel(&self.url, e.to_string()))?;

        debug!("WebSocket handshake status: {}", response.status());
        Ok(WebSocketConnection {
            url: self.url.clone(),
            stream,
        })
    }
}

impl PushConnection for WebSocketConnection {
    async fn send_text(&mut self, text: String) -> Result<(), AppError> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| AppError::live_channel(&self.url, e.to_string()))
    }

    async fn next_text(&mut self) -> Option<Result<String, AppError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(txt)) => return Some(Ok(txt.as_str().to_owned())),
                Ok(Message::Ping(payload)) => {
                    let _ = self.stream.send(Message::Pong(payload)).await;
                }
                Ok(Message::Close(frame)) => {
                    debug!("Live channel closed by peer: {:?}", frame);
                    return None;
                }
                Ok(other) => trace!("Ignoring non-text frame: {:?}", other),
                Err(e) => return Some(Err(AppError::live_channel(&self.url, e.to_string()))),
            }
        }
    }
}
