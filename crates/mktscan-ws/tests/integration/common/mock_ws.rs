//! Mock combined-stream server for integration tests.
//!
//! Provides a WebSocket server that can:
//! - Accept connections and record the requested stream path
//! - Record when a client closes or drops its connection
//! - Push text frames to every connected client

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

/// Frame that makes the server close the connection itself.
pub const SERVER_CLOSE: &str = "__server_close__";

/// A mock stream server for testing.
pub struct MockStreamServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    events: Arc<Mutex<Vec<String>>>,
    active: Arc<Mutex<u32>>,
    push_tx: broadcast::Sender<String>,
}

impl MockStreamServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let active: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let (push_tx, _) = broadcast::channel::<String>(64);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let events_clone = events.clone();
        let active_clone = active.clone();
        let push_clone = push_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        tokio::spawn(handle_connection(
                            stream,
                            events_clone.clone(),
                            active_clone.clone(),
                            push_clone.clone(),
                        ));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            events,
            active,
            push_tx,
        }
    }

    /// Base URL to hand to the stream client.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Connection lifecycle events in order (`connect:<path>`, `close:<path>`, `drop:<path>`).
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Number of currently open connections.
    pub fn active_connections(&self) -> u32 {
        *self.active.lock().unwrap()
    }

    /// Send a text frame to every connected client.
    pub fn push(&self, frame: &str) {
        let _ = self.push_tx.send(frame.to_string());
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    events: Arc<Mutex<Vec<String>>>,
    active: Arc<Mutex<u32>>,
    push_tx: broadcast::Sender<String>,
) {
    let mut path = String::new();
    let record_path = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        path = req.uri().to_string();
        Ok(resp)
    };
    let ws_stream = match accept_hdr_async(stream, record_path).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let mut push_rx = push_tx.subscribe();
    *active.lock().unwrap() += 1;
    events.lock().unwrap().push(format!("connect:{path}"));

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) => {
                        events.lock().unwrap().push(format!("close:{path}"));
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => {
                        events.lock().unwrap().push(format!("drop:{path}"));
                        break;
                    }
                }
            }
            frame = push_rx.recv() => {
                match frame {
                    Ok(text) if text == SERVER_CLOSE => {
                        let _ = write.send(Message::Close(None)).await;
                        events.lock().unwrap().push(format!("server_close:{path}"));
                        break;
                    }
                    Ok(text) => {
                        let _ = write.send(Message::Text(text)).await;
                    }
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(_)) => {}
                }
            }
        }
    }

    *active.lock().unwrap() -= 1;
}
