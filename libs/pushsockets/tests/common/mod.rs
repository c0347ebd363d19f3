//! Common test utilities for PushSockets integration tests
//!
//! Provides a scripted WebSocket server that pushes frames to each client.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// What the server does after pushing its frames
#[derive(Debug, Clone)]
pub enum AfterFrames {
    /// Keep the connection open until the client leaves
    StayOpen,
    /// Send a close frame with the given reason
    Close(String),
}

/// A mock push server for testing
pub struct MockPushServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    client_disconnects: Arc<AtomicUsize>,
}

impl MockPushServer {
    /// Start a server that sends `frames` to every client, then `after`
    pub async fn start(frames: Vec<String>, after: AfterFrames) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let shutdown_clone = shutdown.clone();
        let client_disconnects = Arc::new(AtomicUsize::new(0));
        let disconnects_clone = client_disconnects.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let frames = frames.clone();
                                let after = after.clone();
                                let disconnects = disconnects_clone.clone();
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, frames, after, disconnects).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown,
            client_disconnects,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        frames: Vec<String>,
        after: AfterFrames,
        disconnects: Arc<AtomicUsize>,
    ) {
        use futures::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;

        let mut ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        for frame in frames {
            if ws_stream.send(Message::Text(frame)).await.is_err() {
                return;
            }
        }

        if let AfterFrames::Close(reason) = after {
            let _ = ws_stream
                .send(Message::Close(Some(CloseFrame {
                    code: CloseCode::Normal,
                    reason: reason.into(),
                })))
                .await;
        }

        // Drain until the client goes away
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
        disconnects.fetch_add(1, Ordering::SeqCst);
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Number of client connections that have ended
    pub fn client_disconnects(&self) -> usize {
        self.client_disconnects.load(Ordering::SeqCst)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockPushServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
