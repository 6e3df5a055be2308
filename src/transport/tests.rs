use super::message::ClientMessage;
use super::{PeerTable, Transport};
use crate::broker::{ForwardPayload, PayloadKind};
use crate::client::{Client, ConnectionId};
use crate::utils::error::TransportError;
use bytes::Bytes;
use std::net::{IpAddr, Ipv6Addr};
use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

fn parse(raw: &'static str) -> ClientMessage {
    ClientMessage::parse(Bytes::from_static(raw.as_bytes()))
}

#[test]
fn test_parse_subscribe() {
    assert_eq!(
        parse("subscribe:news"),
        ClientMessage::Subscribe {
            topic: "news".into()
        }
    );
}

#[test]
fn test_parse_subscribe_keeps_colons_in_topic() {
    assert_eq!(
        parse("subscribe:a:b:c"),
        ClientMessage::Subscribe {
            topic: "a:b:c".into()
        }
    );
}

#[test]
fn test_parse_subscribe_without_topic() {
    assert_eq!(parse("subscribe:"), ClientMessage::Unrecognized);
}

#[test]
fn test_parse_publish_splits_topic_from_forward_payload() {
    assert_eq!(
        parse("message:news:text/plain:hello.txt:hi: there"),
        ClientMessage::Publish {
            topic: "news".into(),
            payload: ForwardPayload::new(Bytes::from_static(b"text/plain:hello.txt:hi: there")),
        }
    );
}

#[test]
fn test_parse_publish_without_topic_delimiter() {
    assert_eq!(parse("message:news"), ClientMessage::Unrecognized);
}

#[test]
fn test_parse_unknown_prefix() {
    assert_eq!(parse("unsubscribe:news"), ClientMessage::Unrecognized);
    assert_eq!(parse("Subscribe:news"), ClientMessage::Unrecognized);
    assert_eq!(parse(""), ClientMessage::Unrecognized);
}

#[test]
fn test_parse_keeps_non_utf8_topic_bytes() {
    let subscribe = ClientMessage::parse(Bytes::from_static(b"subscribe:\xff"));
    let publish = ClientMessage::parse(Bytes::from_static(b"message:\xfe:a:b:c"));

    match subscribe {
        ClientMessage::Subscribe { topic } => assert_eq!(topic.as_bytes(), b"\xff"),
        other => panic!("expected subscribe, got {other:?}"),
    }
    match publish {
        ClientMessage::Publish { topic, .. } => assert_eq!(topic.as_bytes(), b"\xfe"),
        other => panic!("expected publish, got {other:?}"),
    }
}

#[test]
fn test_forward_payload_header() {
    let payload = ForwardPayload::new(Bytes::from_static(b"image/png:cat.png:\x89PNG"));
    let header = payload.header().expect("well-formed payload");
    assert_eq!(header.mime_type, "image/png");
    assert_eq!(header.filename, "cat.png");
}

#[test]
fn test_forward_payload_header_allows_empty_data() {
    let payload = ForwardPayload::new(Bytes::from_static(b"text/plain:empty.txt:"));
    assert!(payload.header().is_some());
}

#[test]
fn test_forward_payload_header_needs_two_colons() {
    assert!(ForwardPayload::new(Bytes::from_static(b"notenoughcolons")).header().is_none());
    assert!(ForwardPayload::new(Bytes::from_static(b"a:b")).header().is_none());
}

#[test]
fn test_peer_table_sends_with_kind() {
    let mut peers = PeerTable::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx, None);
    let id = client.id;
    peers.attach(client);

    peers
        .send(id, Bytes::from_static(b"text/plain:a.txt:hi"), PayloadKind::Text)
        .unwrap();
    peers
        .send(id, Bytes::from_static(b"bin:a.bin:\x00\x01"), PayloadKind::Binary)
        .unwrap();

    match rx.try_recv().unwrap() {
        WsMessage::Text(text) => assert_eq!(text.as_str(), "text/plain:a.txt:hi"),
        other => panic!("Expected a text message, got {other:?}"),
    }
    match rx.try_recv().unwrap() {
        WsMessage::Binary(data) => assert_eq!(&data[..], b"bin:a.bin:\x00\x01"),
        other => panic!("Expected a binary message, got {other:?}"),
    }
}

#[test]
fn test_peer_table_remote_address() {
    let mut peers = PeerTable::new();
    let (tx, _rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx, Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    let id = client.id;
    peers.attach(client);

    assert_eq!(peers.remote_address(id).unwrap(), "::1");
}

#[test]
fn test_peer_table_errors() {
    let mut peers = PeerTable::new();
    let unknown = ConnectionId::new();
    assert_eq!(
        peers.remote_address(unknown),
        Err(TransportError::UnknownConnection(unknown))
    );

    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx, None);
    let id = client.id;
    peers.attach(client);
    assert_eq!(
        peers.remote_address(id),
        Err(TransportError::AddressUnavailable(id))
    );

    // Drop the receiver to close the channel
    drop(rx);
    assert_eq!(
        peers.send(id, Bytes::from_static(b"a:b:c"), PayloadKind::Text),
        Err(TransportError::Closed(id))
    );

    assert_eq!(
        peers.send(id, Bytes::from_static(b"\xff\xfe"), PayloadKind::Text),
        Err(TransportError::InvalidText(id))
    );

    assert!(peers.detach(id).is_some());
    assert!(peers.is_empty());
}
