use super::PeerTable;
use super::websocket::{SharedRouter, serve, shared_router, websocket_config};
use crate::broker::Router;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tungstenite::protocol::Message as WsMessage;

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const QUIET_PERIOD: Duration = Duration::from_millis(200);

async fn start_relay(max_message_bytes: usize) -> (String, SharedRouter) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let router = shared_router();

    tokio::spawn(serve(
        listener,
        websocket_config(max_message_bytes),
        router.clone(),
    ));

    (format!("ws://{addr}"), router)
}

async fn connect(url: &str) -> Ws {
    let (ws_stream, _) = connect_async(url).await.expect("WebSocket handshake failed");
    ws_stream
}

async fn wait_until(router: &SharedRouter, cond: impl Fn(&Router<PeerTable>) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if cond(&*router.lock().await) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("relay did not reach the expected state");
}

async fn next_message(ws: &mut Ws) -> WsMessage {
    tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Did not receive message")
        .expect("stream ended")
        .expect("read error")
}

async fn assert_silent(ws: &mut Ws) {
    let res = tokio::time::timeout(QUIET_PERIOD, ws.next()).await;
    assert!(res.is_err(), "unexpected frame: {res:?}");
}

async fn subscribe_all(router: &SharedRouter, topic: &'static str, clients: &mut [&mut Ws]) {
    for ws in clients.iter_mut() {
        ws.send(WsMessage::text(format!("subscribe:{topic}")))
            .await
            .expect("Failed to send subscribe message");
    }
    let expected = clients.len();
    wait_until(router, |r| r.registry().subscribers_of(topic).len() == expected).await;
}

#[tokio::test]
async fn test_text_publish_reaches_other_subscriber_only() {
    let (url, router) = start_relay(1024 * 1024).await;
    let mut ws_x = connect(&url).await;
    let mut ws_y = connect(&url).await;
    subscribe_all(&router, "news", &mut [&mut ws_x, &mut ws_y]).await;

    {
        let router = router.lock().await;
        assert_eq!(router.tracker().len(), 2);
        assert_eq!(router.transport().len(), 2);
    }

    ws_x.send(WsMessage::text("message:news:text/plain:hello.txt:hi there"))
        .await
        .expect("Failed to send publish");

    match next_message(&mut ws_y).await {
        WsMessage::Text(text) => assert_eq!(text.as_str(), "text/plain:hello.txt:hi there"),
        other => panic!("Expected a text message, got {other:?}"),
    }
    assert_silent(&mut ws_x).await;
}

#[tokio::test]
async fn test_binary_publish_keeps_kind_and_bytes() {
    let (url, router) = start_relay(1024 * 1024).await;
    let mut ws_a = connect(&url).await;
    let mut ws_b = connect(&url).await;
    subscribe_all(&router, "files", &mut [&mut ws_a, &mut ws_b]).await;

    let mut frame = b"message:files:application/octet-stream:blob.bin:".to_vec();
    frame.extend_from_slice(&[0x00, 0xff, b':', 0x10]);
    ws_a.send(WsMessage::binary(frame))
        .await
        .expect("Failed to send publish");

    match next_message(&mut ws_b).await {
        WsMessage::Binary(data) => assert_eq!(
            &data[..],
            b"application/octet-stream:blob.bin:\x00\xff:\x10"
        ),
        other => panic!("Expected a binary message, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_publish_is_dropped_and_sender_stays_connected() {
    let (url, router) = start_relay(1024 * 1024).await;
    let mut ws_z = connect(&url).await;
    let mut ws_w = connect(&url).await;
    subscribe_all(&router, "sports", &mut [&mut ws_z, &mut ws_w]).await;

    ws_z.send(WsMessage::text("message:sports:a:b"))
        .await
        .expect("Failed to send publish");
    assert_silent(&mut ws_w).await;

    ws_z.send(WsMessage::text("message:sports:text/plain:score.txt:2-1"))
        .await
        .expect("sender should still be connected");
    match next_message(&mut ws_w).await {
        WsMessage::Text(text) => assert_eq!(text.as_str(), "text/plain:score.txt:2-1"),
        other => panic!("Expected a text message, got {other:?}"),
    }
}

#[tokio::test]
async fn test_close_cleans_up_connection_state() {
    let (url, router) = start_relay(1024 * 1024).await;
    let mut ws = connect(&url).await;
    subscribe_all(&router, "solo", &mut [&mut ws]).await;

    ws.close(None).await.expect("Failed to close WebSocket");

    wait_until(&router, |r| {
        r.registry().is_empty() && r.tracker().is_empty() && r.transport().is_empty()
    })
    .await;
}

#[tokio::test]
async fn test_oversized_message_closes_connection() {
    let (url, router) = start_relay(64).await;
    let mut ws = connect(&url).await;
    subscribe_all(&router, "big", &mut [&mut ws]).await;

    let payload = format!("message:big:text/plain:big.txt:{}", "x".repeat(256));
    // The server may already be gone by the time the send completes.
    let _ = ws.send(WsMessage::text(payload)).await;

    wait_until(&router, |r| r.registry().is_empty() && r.transport().is_empty()).await;
}
