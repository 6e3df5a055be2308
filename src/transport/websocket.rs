//! WebSocket transport
//!
//! Accepts TCP connections, performs the WebSocket handshake with the
//! configured size limits and turns each connection into router events:
//! - `on_open` once the handshake succeeds and the client is attached to the
//!   peer table
//! - `on_message` for every text or binary frame, tagged with its kind
//! - `on_close` when the peer closes, the socket errors or a frame exceeds
//!   the size limit
//!
//! Each connection gets a reader loop (this task) and a writer task that
//! drains the client's outbound queue onto the socket. The router lock is
//! never held across socket I/O.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::accept_async_with_config;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;
use tungstenite::protocol::WebSocketConfig;

use crate::broker::{ConnectionHandler, PayloadKind, Router};
use crate::client::Client;
use crate::config::Settings;
use crate::transport::PeerTable;
use crate::utils::error::{RelayError, Result};

/// The router as shared between connection tasks.
pub type SharedRouter = Arc<Mutex<Router<PeerTable>>>;

pub fn shared_router() -> SharedRouter {
    Arc::new(Mutex::new(Router::new(PeerTable::new())))
}

/// Handshake configuration enforcing `max_message_bytes` on both whole
/// messages and single frames.
pub fn websocket_config(max_message_bytes: usize) -> WebSocketConfig {
    WebSocketConfig::default()
        .max_message_size(Some(max_message_bytes))
        .max_frame_size(Some(max_message_bytes))
}

/// Binds the configured address and serves until the task is dropped.
pub async fn start_websocket_server(settings: &Settings, router: SharedRouter) -> Result<()> {
    let addr = settings.server.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| RelayError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!(
        "Server started. IP: {}, Port: {}, Max message size: {} MB",
        settings.server.ip, settings.server.port, settings.transport.max_message_size_mb
    );

    let config = websocket_config(settings.transport.max_message_bytes());
    serve(listener, config, router).await;
    Ok(())
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, config: WebSocketConfig, router: SharedRouter) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_connection(stream, config, router.clone()));
            }
            Err(e) => {
                warn!("Failed to accept connection: {e}");
            }
        }
    }
}

async fn handle_connection(stream: TcpStream, config: WebSocketConfig, router: SharedRouter) {
    // Read before the handshake; the socket may be gone afterwards.
    let remote_ip = match stream.peer_addr() {
        Ok(addr) => Some(addr.ip()),
        Err(e) => {
            debug!("Peer address unavailable: {e}");
            None
        }
    };

    let ws_stream = match accept_async_with_config(stream, Some(config)).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx, remote_ip);
    let id = client.id;

    {
        let mut router = router.lock().await;
        router.transport_mut().attach(client);
        router.on_open(id);
    }

    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(msg).await {
                debug!("Failed to send message to {id}: {e}");
                break;
            }
        }
        let _ = ws_sender.close().await;
        debug!("Send loop closed for {id}");
    });

    while let Some(frame) = ws_receiver.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(e) => {
                debug!("Read error on {id}: {e}");
                break;
            }
        };
        let kind = match &msg {
            WsMessage::Text(_) => PayloadKind::Text,
            WsMessage::Binary(_) => PayloadKind::Binary,
            WsMessage::Close(_) => break,
            _ => continue,
        };
        router.lock().await.on_message(id, msg.into_data(), kind);
    }

    {
        let mut router = router.lock().await;
        router.on_close(id);
        // Dropping the client's sender lets the writer finish.
        router.transport_mut().detach(id);
    }

    let _ = writer.await;
}
