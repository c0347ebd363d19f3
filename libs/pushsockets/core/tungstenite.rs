use crate::core::channel::{ChannelFeed, PushChannel};
use crate::traits::*;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

/// Default handshake timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Connector backed by tokio-tungstenite
///
/// Each successful `open` spawns one transport task that owns the socket,
/// forwards data frames to the channel and closes the socket when the
/// consumer closes or drops its [`PushChannel`].
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    connect_timeout: Duration,
}

impl TungsteniteConnector {
    /// Create a connector with the default handshake timeout
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Override the handshake timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for TungsteniteConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn open(&self, url: &str) -> Result<PushChannel> {
        debug!("Opening push channel to {}", url);

        let (ws_stream, _) = tokio::time::timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| {
                PushSocketError::Timeout(format!(
                    "handshake with {} exceeded {:?}",
                    url, self.connect_timeout
                ))
            })?
            .map_err(|e| PushSocketError::WebSocket(e.to_string()))?;

        info!("Push channel connected to {}", url);

        let (channel, feed) = PushChannel::pair();
        tokio::spawn(pump(ws_stream, feed));

        Ok(channel)
    }
}

/// Transport task: socket → channel until either side goes away
async fn pump(mut ws: WsStream, feed: ChannelFeed) {
    loop {
        tokio::select! {
            _ = feed.closed() => {
                debug!("Push channel closed by consumer, closing socket");
                let _ = ws.close(None).await;
                break;
            }
            msg = ws.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        let forwarded = match msg {
                            Message::Text(text) => feed.frame(WsMessage::Text(text)),
                            Message::Binary(data) => feed.frame(WsMessage::Binary(data)),
                            Message::Close(frame) => {
                                let reason = frame
                                    .map(|f| f.reason.to_string())
                                    .filter(|r| !r.is_empty());
                                debug!("Server closed push channel: {:?}", reason);
                                let _ = feed.closed_by_remote(reason);
                                break;
                            }
                            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(()),
                        };

                        if forwarded.is_err() {
                            debug!("Push channel consumer gone, closing socket");
                            let _ = ws.close(None).await;
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Push channel error: {}", e);
                        let _ = feed.error(e.to_string());
                        break;
                    }
                    None => {
                        debug!("Push channel stream ended");
                        let _ = feed.closed_by_remote(None);
                        break;
                    }
                }
            }
        }
    }

    debug!("Push transport task exiting");
}
