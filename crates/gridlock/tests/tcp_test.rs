//! TCP peer link on loopback.

use gridlock::{ChannelEvent, Event, SessionCode, tcp};
use gridlock_session::{Message, Transport};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn next(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within 5s")
        .expect("channel still open")
}

#[tokio::test]
async fn test_host_and_join_exchange_lines() {
    let listener = tcp::listen("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let code = SessionCode::parse("ABC123").unwrap();

    let (host_tx, mut host_rx) = mpsc::unbounded_channel();
    let (join_tx, mut join_rx) = mpsc::unbounded_channel();
    let mut host = tcp::host(listener, code.clone(), host_tx);
    let mut joiner = tcp::join(addr, SessionCode::parse("abc123").unwrap(), join_tx);

    assert_eq!(next(&mut host_rx).await, Event::Channel(ChannelEvent::Open));
    assert_eq!(next(&mut join_rx).await, Event::Channel(ChannelEvent::Open));
    assert!(host.is_open());
    assert!(joiner.is_open());

    let hello = Message::Chat {
        message: "?: hi".into(),
    };
    joiner.send(&hello).unwrap();
    match next(&mut host_rx).await {
        Event::Channel(ChannelEvent::Data(raw)) => {
            assert_eq!(Message::decode(&raw).unwrap(), hello)
        }
        other => panic!("expected data, got {other:?}"),
    }

    host.send(&Message::clear()).unwrap();
    match next(&mut join_rx).await {
        Event::Channel(ChannelEvent::Data(raw)) => {
            assert_eq!(Message::decode(&raw).unwrap(), Message::clear())
        }
        other => panic!("expected data, got {other:?}"),
    }

    drop(host);
    drop(joiner);
}

#[tokio::test]
async fn test_wrong_code_is_refused() {
    let listener = tcp::listen("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let (host_tx, _host_rx) = mpsc::unbounded_channel();
    let (join_tx, mut join_rx) = mpsc::unbounded_channel();
    let host = tcp::host(listener, SessionCode::parse("ABC123").unwrap(), host_tx);
    let joiner = tcp::join(addr, SessionCode::parse("ZZZ999").unwrap(), join_tx);

    assert!(matches!(
        next(&mut join_rx).await,
        Event::Channel(ChannelEvent::Error(_))
    ));
    assert!(!host.is_open());
    assert!(!joiner.is_open());
}

#[tokio::test]
async fn test_send_before_open_fails() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut joiner = tcp::join(
        "127.0.0.1:1".to_string(),
        SessionCode::parse("ABC123").unwrap(),
        tx,
    );
    assert!(joiner.send(&Message::clear()).is_err());
}
